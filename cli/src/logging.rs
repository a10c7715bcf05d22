//! Logging initialization: logs go to a daily-rolling file, never to the terminal.
//!
//! - **RUST_LOG**: filter, e.g. `info`, `shouldi=debug`. Default: `info,hyper_util=off`.
//! - **SHOULDI_LOG_DIR**: log directory. Default: `$XDG_STATE_HOME/shouldi/logs` (see
//!   `config::log_dir`).
//!
//! When the directory cannot be created, logs are dropped so stdout and the TUI stay clean.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_format::TextWithSpanIds;

pub const LOG_DIR_ENV: &str = "SHOULDI_LOG_DIR";
const LOG_FILE_PREFIX: &str = "shouldi";

/// Keeps the background writer alive; drop it at exit to flush.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper_util=off"))
}

fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    std::fs::create_dir_all(dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .ok()
}

/// Installs the global subscriber. Call once, after `.env` / config.toml were applied.
pub fn init() -> LogGuard {
    let dir = config::log_dir(shouldi::settings::APP_NAME, LOG_DIR_ENV);
    match file_appender(&dir) {
        Some(appender) => {
            let (writer, worker) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(TextWithSpanIds::new())
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter());
            let _ = tracing_subscriber::registry().with(file_layer).try_init();
            tracing::info!(dir = %dir.display(), "shouldi logging to file");
            LogGuard {
                _worker: Some(worker),
            }
        }
        None => {
            let sink_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::sink)
                .with_filter(env_filter());
            let _ = tracing_subscriber::registry().with(sink_layer).try_init();
            LogGuard { _worker: None }
        }
    }
}
