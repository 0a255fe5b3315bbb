//! System-level errors (filesystem, terminal, process environment).

use std::fmt;
use std::path::PathBuf;

/// System-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemError {
    /// Permission denied on a path.
    PermissionDenied { path: PathBuf, operation: String },

    /// Could not create a directory (e.g. the log directory).
    DirectoryCreationFailed { path: PathBuf, message: String },

    /// The platform has no cache directory to hold the log file.
    NoCacheDirectory,

    /// Generic I/O failure.
    IoError {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },
}

impl SystemError {
    pub fn user_message(&self) -> String {
        match self {
            SystemError::PermissionDenied { path, operation } => {
                format!("Permission denied while trying to {} {}", operation, path.display())
            }
            SystemError::DirectoryCreationFailed { path, .. } => {
                format!("Could not create directory {}", path.display())
            }
            SystemError::NoCacheDirectory => {
                "Could not determine a cache directory; pass --log-file.".to_string()
            }
            SystemError::IoError { operation, .. } => format!("I/O error during {}", operation),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SystemError::PermissionDenied { .. } => "SYS_PERMISSION",
            SystemError::DirectoryCreationFailed { .. } => "SYS_MKDIR",
            SystemError::NoCacheDirectory => "SYS_NO_CACHE_DIR",
            SystemError::IoError { .. } => "SYS_IO",
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied: {} {}", operation, path.display())
            }
            SystemError::DirectoryCreationFailed { path, message } => {
                write!(f, "Failed to create {}: {}", path.display(), message)
            }
            SystemError::NoCacheDirectory => write!(f, "No cache directory"),
            SystemError::IoError {
                operation,
                path: Some(p),
                message,
            } => write!(f, "I/O error during {} on {}: {}", operation, p.display(), message),
            SystemError::IoError {
                operation,
                path: None,
                message,
            } => write!(f, "I/O error during {}: {}", operation, message),
        }
    }
}

impl std::error::Error for SystemError {}

/// Classify an I/O error, keeping the path when one is known.
pub fn classify_io_error(err: std::io::Error, path: Option<PathBuf>, operation: &str) -> SystemError {
    match (err.kind(), path) {
        (std::io::ErrorKind::PermissionDenied, Some(path)) => SystemError::PermissionDenied {
            path,
            operation: operation.to_string(),
        },
        (_, path) => SystemError::IoError {
            operation: operation.to_string(),
            path,
            message: err.to_string(),
        },
    }
}
