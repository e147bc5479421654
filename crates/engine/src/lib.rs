//! A small retro-style engine: one window, a fixed-resolution indexed-colour
//! canvas, keyboard snapshots and a fixed-step frame loop.

mod app;

pub use app::{
    AppError, Canvas, Color, Engine, InputAction, InputSnapshot, LoopConfig, Scene,
    MAX_WINDOW_SCALE,
};
