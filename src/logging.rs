use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "nearest-flight.log";

/// Logs every request and lookup outcome to stdout and to a daily rolling
/// file under `logs/`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn initialize_logging() -> WorkerGuard {
    // The subscriber isn't installed yet, so this one goes to stderr.
    if let Err(e) = std::fs::create_dir_all(LOG_DIR) {
        eprintln!("Could not create log directory '{}': {}", LOG_DIR, e);
    }

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_target(false))
        .init();

    tracing::info!("Request log at {}/{}", LOG_DIR, LOG_FILE);
    guard
}
