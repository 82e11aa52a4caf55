//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional daily-rolling NDJSON
//! files, and environment-based level control.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix of rolled log files (`folio.log.YYYY-MM-DD`).
const LOG_FILE_PREFIX: &str = "folio.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default filter directive when `RUST_LOG` is unset, e.g. `info` or `folio_media=debug`.
    pub level: String,
    /// Emit JSON on the console instead of human-readable lines.
    pub json: bool,
    /// Directory for rolling NDJSON files; console only when `None`.
    pub dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

/// Keeps the background file writer alive; drop it only at shutdown.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global structured logger.
///
/// Returns `None` when a global subscriber was already installed.
pub fn init_logger(options: &LogOptions) -> Option<LogGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    // Console output goes to stderr so command output on stdout stays clean.
    let console_layer = if options.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let (file_layer, file_guard) = match &options.dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok()
        .map(|()| LogGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let options = LogOptions {
            level: "debug".into(),
            json: true,
            dir: Some(dir.path().to_path_buf()),
        };
        let first = init_logger(&options);
        assert!(first.is_some());
        tracing::info!(test = true, "logger initialized");
        assert!(init_logger(&LogOptions::default()).is_none());
    }
}
