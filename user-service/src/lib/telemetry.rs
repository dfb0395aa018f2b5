use std::io;
use std::path::Path;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_DIRECTORY: &str = "logs";
pub const LOG_FILE: &str = "app.log";

const DEFAULT_FILTER: &str = "user_service=debug,tower_http=debug";

/// Install the global subscriber.
///
/// Stdout gets human-readable lines in `dev` and JSON elsewhere; a plain-text
/// copy of every event is appended to `{log_directory}/app.log`. The returned
/// guard must live as long as the process; dropping it flushes and stops the
/// file writer.
pub fn init(human_readable: bool, log_directory: &Path) -> Result<WorkerGuard, anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let (file_writer, guard) = file_writer(log_directory)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(human_readable.then(|| fmt::layer()))
        .with((!human_readable).then(|| fmt::layer().json()))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}

/// Non-blocking appender for `{log_directory}/app.log`, creating the directory.
fn file_writer(log_directory: &Path) -> Result<(NonBlocking, WorkerGuard), io::Error> {
    std::fs::create_dir_all(log_directory)?;
    let appender = tracing_appender::rolling::never(log_directory, LOG_FILE);
    Ok(tracing_appender::non_blocking(appender))
}
