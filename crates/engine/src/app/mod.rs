mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{AppError, Engine, LoopConfig, MAX_WINDOW_SCALE};
pub use rendering::{Canvas, Color};
pub(crate) use rendering::Renderer;
pub use scene::Scene;
