use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::{InputAction, InputSnapshot, Renderer, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Integer factor between canvas pixels and logical window pixels.
    pub window_scale: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Retro Engine".to_string(),
            canvas_width: 160,
            canvas_height: 160,
            window_scale: 4,
            target_tps: 30,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

/// Largest accepted `window_scale`.
pub const MAX_WINDOW_SCALE: u32 = 16;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("canvas size must be non-zero, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("window scale {scale} is outside 1..={max}", max = MAX_WINDOW_SCALE)]
    WindowScaleOutOfRange { scale: u32 },
    #[error("window size overflows for a {width}x{height} canvas at scale {scale}")]
    WindowTooLarge { width: u32, height: u32, scale: u32 },
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Window, event loop and renderer for one session.
///
/// Everything is created by [`Engine::new`] and released when the engine is
/// dropped; [`Engine::run`] consumes the handle and returns once the window
/// has closed.
pub struct Engine {
    config: LoopConfig,
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    renderer: Renderer,
}

impl Engine {
    pub fn new(config: LoopConfig) -> Result<Self, AppError> {
        let (scale, window_width, window_height) = window_size(&config)?;

        let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.window_title.clone())
                .with_inner_size(LogicalSize::new(window_width as f64, window_height as f64))
                .with_min_inner_size(LogicalSize::new(
                    config.canvas_width as f64,
                    config.canvas_height as f64,
                ))
                .build(&event_loop)
                .map_err(AppError::CreateWindow)?,
        );
        let renderer = Renderer::new(
            Arc::clone(&window),
            config.canvas_width,
            config.canvas_height,
        )
        .map_err(AppError::CreateRenderer)?;

        info!(
            title = config.window_title.as_str(),
            canvas_width = config.canvas_width,
            canvas_height = config.canvas_height,
            window_scale = scale,
            "startup"
        );

        Ok(Self {
            config,
            event_loop,
            window,
            renderer,
        })
    }

    /// Drives `scene` until the window is closed or Escape is pressed.
    pub fn run<S: Scene>(self, mut scene: S) -> Result<(), AppError> {
        let Engine {
            config,
            event_loop,
            window,
            mut renderer,
        } = self;

        event_loop.set_control_flow(ControlFlow::Poll);

        let target_tps = config.target_tps.max(1);
        let max_frame_delta =
            normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
        let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
        let metrics_log_interval =
            normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
        let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
        let slow_frame_delay = Duration::from_millis(config.simulated_slow_frame_ms);
        let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
        let render_frame_target = target_frame_duration(effective_render_cap);
        let mut input_collector = InputCollector::default();

        info!(
            target_tps,
            max_frame_delta_ms = max_frame_delta.as_millis() as u64,
            max_ticks_per_frame,
            metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
            slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
            render_fps_cap = %format_render_cap(effective_render_cap),
            "loop_config"
        );

        let mut accumulator = Duration::ZERO;
        let mut last_frame_instant = Instant::now();
        let mut last_present_instant = Instant::now();
        let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

        event_loop
            .run(move |event, window_target| match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                    WindowEvent::CloseRequested => {
                        input_collector.mark_quit_requested();
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::Focused(false) => {
                        input_collector.release_all();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if slow_frame_delay > Duration::ZERO {
                            // Debug perturbation only; this is not the FPS cap.
                            thread::sleep(slow_frame_delay);
                        }

                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                        accumulator = accumulator.saturating_add(clamped_frame_dt);

                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            let input_snapshot = input_collector.snapshot_for_tick();
                            scene.update(&input_snapshot);
                            metrics_accumulator.record_tick();
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            let dropped_ticks = ticks_in(step_plan.dropped_backlog, fixed_dt);
                            metrics_accumulator.record_dropped_ticks(dropped_ticks);
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                dropped_ticks,
                                max_ticks_per_frame,
                                "sim_clamp_triggered"
                            );
                        }

                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep =
                            compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        if let Err(error) = renderer.render_frame(|canvas| scene.draw(canvas)) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        last_present_instant = Instant::now();
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            debug!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                dropped_ticks = snapshot.dropped_ticks,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    window.request_redraw();
                }
                Event::LoopExiting => {
                    scene.unload();
                    info!("shutdown");
                }
                _ => {}
            })
            .map_err(AppError::EventLoopRun)
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        self.action_states.set(action, is_pressed);
        if action == InputAction::Quit && is_pressed {
            self.mark_quit_requested();
        }
    }

    /// Releases every held action, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    fn release_all(&mut self) {
        for action in ALL_ACTIONS {
            self.action_states.set(action, false);
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.action_states);
        self.action_states.clear_pressed();
        snapshot
    }
}

const ALL_ACTIONS: [InputAction; 7] = [
    InputAction::MoveUp,
    InputAction::MoveDown,
    InputAction::MoveLeft,
    InputAction::MoveRight,
    InputAction::Interact,
    InputAction::Cancel,
    InputAction::Quit,
];

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(InputAction::MoveUp),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(InputAction::MoveDown),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(InputAction::MoveLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(InputAction::MoveRight),
        KeyCode::KeyE => Some(InputAction::Interact),
        KeyCode::KeyQ => Some(InputAction::Cancel),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

/// Effective scale and logical window size for `config`. A scale of zero is
/// treated as one.
fn window_size(config: &LoopConfig) -> Result<(u32, u32, u32), AppError> {
    if config.canvas_width == 0 || config.canvas_height == 0 {
        return Err(AppError::EmptyCanvas {
            width: config.canvas_width,
            height: config.canvas_height,
        });
    }
    let scale = config.window_scale.max(1);
    if scale > MAX_WINDOW_SCALE {
        return Err(AppError::WindowScaleOutOfRange { scale });
    }
    let too_large = || AppError::WindowTooLarge {
        width: config.canvas_width,
        height: config.canvas_height,
        scale,
    };
    let width = config.canvas_width.checked_mul(scale).ok_or_else(too_large)?;
    let height = config.canvas_height.checked_mul(scale).ok_or_else(too_large)?;
    Ok((scale, width, height))
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn ticks_in(backlog: Duration, fixed_dt: Duration) -> u32 {
    if fixed_dt.is_zero() {
        return 0;
    }
    let ticks = backlog.as_nanos() / fixed_dt.as_nanos();
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
