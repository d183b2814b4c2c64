//! Logging setup
//!
//! The interactive view owns the terminal, so its logs go to a file in the
//! cache directory (`~/.cache/walkfinder/walkfinder.log` on Linux). The
//! one-shot mode logs warnings to stderr instead. `RUST_LOG` overrides the
//! default filter in both cases.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log file name inside the cache directory
const LOG_FILE_NAME: &str = "walkfinder.log";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// No home directory to derive a cache location from
    #[error("Could not determine a cache directory for the log file")]
    NoCacheDir,

    /// The log file could not be created
    #[error("Failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A global subscriber is already installed
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file
    File(PathBuf),
    /// Write to stderr
    Stderr,
}

/// Default log file location in the XDG cache directory
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "walkfinder")?;
    Some(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Picks the log target for the given mode
pub fn resolve_target(once: bool, log_file: Option<&Path>) -> Result<LogTarget, LoggingError> {
    if let Some(path) = log_file {
        return Ok(LogTarget::File(path.to_path_buf()));
    }
    if once {
        return Ok(LogTarget::Stderr);
    }
    default_log_path()
        .map(LogTarget::File)
        .ok_or(LoggingError::NoCacheDir)
}

/// Opens a log file for appending, creating parent directories as needed
fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open_error = |source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_error)
}

/// Installs the global tracing subscriber
///
/// `default_directive` applies when `RUST_LOG` is unset, e.g. `"info"`.
pub fn init(target: &LogTarget, default_directive: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = match target {
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_log_file_wins() {
        let target = resolve_target(true, Some(Path::new("/tmp/custom.log"))).unwrap();
        assert_eq!(target, LogTarget::File(PathBuf::from("/tmp/custom.log")));
    }

    #[test]
    fn test_once_mode_logs_to_stderr() {
        assert_eq!(resolve_target(true, None).unwrap(), LogTarget::Stderr);
    }

    #[test]
    fn test_interactive_mode_uses_cache_dir() {
        // Passes trivially when there is no home directory (e.g. in CI)
        if let Ok(LogTarget::File(path)) = resolve_target(false, None) {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("walkfinder"));
            assert!(path_str.ends_with(LOG_FILE_NAME));
        }
    }

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("logs").join("app.log");

        open_log_file(&path).expect("log file should open");
        assert!(path.exists());
    }
}
