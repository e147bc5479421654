use std::env;
use std::str::FromStr;

use engine::{LoopConfig, MAX_WINDOW_SCALE};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{GameSession, MapError};

const WINDOW_TITLE: &str = "NPC Interação por Proximidade";
const WINDOW_SCALE_ENV_VAR: &str = "NPC_DEMO_WINDOW_SCALE";
const SLOW_FRAME_ENV_VAR: &str = "NPC_DEMO_SLOW_FRAME_MS";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: GameSession,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("failed to build the demo map: {0}")]
    Map(#[from] MapError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== NPC proximity demo ===");

    let defaults = LoopConfig::default();
    let config = LoopConfig {
        window_title: WINDOW_TITLE.to_string(),
        window_scale: window_scale_override(
            env::var(WINDOW_SCALE_ENV_VAR),
            defaults.window_scale,
        ),
        simulated_slow_frame_ms: env_override(
            SLOW_FRAME_ENV_VAR,
            defaults.simulated_slow_frame_ms,
        ),
        ..defaults
    };

    let session = GameSession::new()?;
    info!(
        npc_count = session.npcs().len(),
        spawn_x = session.player().position.x,
        spawn_y = session.player().position.y,
        "session_ready"
    );

    Ok(AppWiring { config, session })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn env_override<T>(var: &'static str, fallback: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    parse_override(var, env::var(var), fallback)
}

/// Window scale from the environment, kept within `1..=MAX_WINDOW_SCALE`.
fn window_scale_override(raw: Result<String, env::VarError>, fallback: u32) -> u32 {
    let scale = parse_override(WINDOW_SCALE_ENV_VAR, raw, fallback);
    if (1..=MAX_WINDOW_SCALE).contains(&scale) {
        return scale;
    }
    warn!(
        env_var = WINDOW_SCALE_ENV_VAR,
        value = scale,
        max = MAX_WINDOW_SCALE,
        fallback,
        "window scale out of range; using default"
    );
    fallback
}

/// Parses an override value, warning and keeping `fallback` when the variable
/// is unreadable or does not parse.
fn parse_override<T>(var: &'static str, raw: Result<String, env::VarError>, fallback: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    env_var = var,
                    value = value.as_str(),
                    fallback = %fallback,
                    "invalid env var value; using default"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = var,
                error = %err,
                fallback = %fallback,
                "unable to read env var; using default"
            );
            fallback
        }
    }
}
