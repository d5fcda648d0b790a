use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| std::io::Error::other("no local data directory"))?;
    let dir = base.join("vault-panes").join("logs");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Install the global subscriber writing to a daily rolling file.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or stderr.
/// Returns `None` if no log directory could be created or a subscriber is
/// already installed.
pub fn init() -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir()
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("vault-panes").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "vault-panes.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vault_panes=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
