//! Tracing initialization.
//!
//! stdout belongs to the TUI, so events go to a log file (no ANSI colors).
//! When no file can be opened, logging is left disabled rather than
//! corrupting the screen.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{classify_io_error, SystemError};

/// Env var holding filter directives, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "SNIFFER_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter from `SNIFFER_LOG`, then `RUST_LOG`, then `info`.
pub fn build_filter() -> EnvFilter {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber writing to `log_path` (appending).
///
/// Creates the parent directory if needed. Returns an error if the file
/// cannot be opened or a subscriber is already installed.
pub fn init_with_file(log_path: &Path) -> Result<(), SystemError> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SystemError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| classify_io_error(e, Some(log_path.to_path_buf()), "open"))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| SystemError::IoError {
            operation: "install log subscriber".to_string(),
            path: Some(log_path.to_path_buf()),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_does_not_panic() {
        let _ = build_filter();
    }

    #[test]
    fn test_init_with_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sniffer.log");

        // A second subscriber in the same test binary fails; the file still exists.
        let _ = init_with_file(&path);
        assert!(path.exists());
    }

    #[test]
    fn test_init_with_file_reports_unwritable_parent() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = init_with_file(&blocker.join("sniffer.log")).unwrap_err();
        assert!(matches!(err, SystemError::DirectoryCreationFailed { .. }));
    }
}
