use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE: &str = "whereabouts.log";

/// Routes tracing output to `<log_dir>/whereabouts.log`, rotated daily.
///
/// The terminal belongs to the TUI, so nothing is written to stdout. Keep the
/// returned guard alive until exit or buffered lines are lost. `RUST_LOG`
/// directives are honoured on top of an INFO floor.
pub fn initialize_logging(log_dir: impl AsRef<Path>) -> WorkerGuard {
    let log_dir = log_dir.as_ref();
    let dir_error = std::fs::create_dir_all(log_dir).err();

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();

    match (installed, dir_error) {
        (Err(e), _) => tracing::warn!("Logging already initialized: {}", e),
        (Ok(()), Some(e)) => tracing::warn!("Could not create {}: {}", log_dir.display(), e),
        (Ok(()), None) => tracing::info!("Logging to {}", log_dir.join(LOG_FILE).display()),
    }
    guard
}
