//! Tracing subscriber setup
//!
//! The dashboard owns the terminal, so in interactive mode logs only go to a
//! file when one is requested. JSON mode logs to stderr, leaving stdout for
//! the output document. `RUST_LOG` overrides the default `info` filter.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber is installed
    Silent,
    Stderr,
    /// Appended to this file, without ANSI colors
    File(PathBuf),
}

impl LogTarget {
    /// An explicit log file always wins; otherwise the dashboard stays
    /// silent and non-interactive runs use stderr.
    pub fn resolve(log_file: Option<&Path>, interactive: bool) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path.to_path_buf()),
            None if interactive => LogTarget::Silent,
            None => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for `target`
pub fn init(target: &LogTarget) -> Result<(), LoggingError> {
    match target {
        LogTarget::Silent => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
            Ok(())
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
            Ok(())
        }
    }
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_without_file_is_silent() {
        assert_eq!(LogTarget::resolve(None, true), LogTarget::Silent);
    }

    #[test]
    fn test_json_mode_logs_to_stderr() {
        assert_eq!(LogTarget::resolve(None, false), LogTarget::Stderr);
    }

    #[test]
    fn test_log_file_wins_in_both_modes() {
        let path = Path::new("/tmp/riskglobe.log");
        assert_eq!(
            LogTarget::resolve(Some(path), true),
            LogTarget::File(path.to_path_buf())
        );
        assert_eq!(
            LogTarget::resolve(Some(path), false),
            LogTarget::File(path.to_path_buf())
        );
    }

    #[test]
    fn test_silent_installs_nothing() {
        assert!(init(&LogTarget::Silent).is_ok());
    }

    #[test]
    fn test_unopenable_log_file_is_reported() {
        let path = Path::new("/nonexistent-dir/riskglobe.log");
        match init(&LogTarget::File(path.to_path_buf())) {
            Err(LoggingError::OpenFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected OpenFile error, got {:?}", other),
        }
    }
}
