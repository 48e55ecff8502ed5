use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the duration of the run.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("laptop_cleaner=info"));

    // Console-only fallback when the log directory cannot be created
    if fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "laptop_cleaner.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // JSON for the file, human readable on the console
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Some(guard)
}
