mod app;

use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    let wiring = match app::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    app::run(wiring)
}
