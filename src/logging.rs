//! Logging initialization with file output support

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, Settings, paths};

/// Log file name prefix inside the log directory
pub const LOG_FILE_NAME: &str = "sftp-readbuf.log";

/// Initialize logging from loaded settings, writing files to the default
/// log directory (see [`paths::log_dir`]) when it can be created.
pub fn init_from_settings(settings: &Settings) -> Option<WorkerGuard> {
    let log_dir = if settings.logging.file {
        paths::ensure_log_dir().ok()
    } else {
        None
    };
    init_logging(&settings.logging, log_dir)
}

fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Initialize logging with optional file output.
///
/// Returns a guard that must be kept alive for as long as file logging is
/// wanted. When the host process already installed a global subscriber,
/// that one is kept and nothing is returned.
pub fn init_logging(settings: &LoggingSettings, log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let console_layer = fmt::layer().with_target(true).with_thread_ids(false);

    match log_dir.filter(|_| settings.file) {
        Some(dir) => {
            // Daily rotating log file
            let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);

            let installed = tracing_subscriber::registry()
                .with(env_filter(settings))
                .with(console_layer)
                .with(file_layer)
                .try_init();

            match installed {
                Ok(()) => {
                    tracing::info!("Logging to {}", dir.display());
                    Some(guard)
                }
                Err(_) => None,
            }
        }
        None => {
            // Console-only logging
            let _ = tracing_subscriber::registry()
                .with(env_filter(settings))
                .with(console_layer)
                .try_init();
            None
        }
    }
}
