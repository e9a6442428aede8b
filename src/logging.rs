use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE_NAME: &str = "labyrinth.log";

/// Send all `tracing` output at `level` or above to `dir/labyrinth.log`.
///
/// The file is written from a background thread; keep the returned guard alive
/// until exit so buffered lines get flushed. Returns `None` if a global subscriber
/// was already installed.
pub fn init_file_logging(dir: impl AsRef<Path>, level: Level) -> Option<WorkerGuard> {
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .with_thread_names(true)
        .try_init()
        .ok()?;
    Some(guard)
}
