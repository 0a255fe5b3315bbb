//! Record lookup errors.

use std::fmt;

/// Errors resolving a record by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No stored record carries this id.
    NotFound { id: u64 },
}

impl LookupError {
    pub fn user_message(&self) -> String {
        match self {
            LookupError::NotFound { id } => format!("No detail available for packet {}.", id),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => "LOOKUP_NOT_FOUND",
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound { id } => write!(f, "Record {} not found", id),
        }
    }
}

impl std::error::Error for LookupError {}
