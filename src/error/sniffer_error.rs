//! Unified error type for the viewer.

use std::fmt;

use super::category::ErrorCategory;
use super::config::ConfigError;
use super::filter::FilterError;
use super::lookup::LookupError;
use super::stream::StreamError;
use super::system::{classify_io_error, SystemError};
use crate::traits::EvaluationError;

/// Unified error type.
///
/// Wraps each domain error so callers can categorize, log and present any
/// failure uniformly.
#[derive(Debug)]
pub enum SnifferError {
    /// Packet feed errors.
    Stream(StreamError),

    /// Filter predicate errors.
    Filter(FilterError),

    /// Record lookup errors.
    Lookup(LookupError),

    /// Configuration errors.
    Config(ConfigError),

    /// System/filesystem errors.
    System(SystemError),
}

impl SnifferError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SnifferError::Stream(StreamError::InvalidFrame { .. }) => ErrorCategory::Upstream,
            SnifferError::Stream(_) => ErrorCategory::Network,
            SnifferError::Filter(FilterError::Evaluation(err)) if err.is_user_error() => {
                ErrorCategory::User
            }
            SnifferError::Filter(_) => ErrorCategory::Dependency,
            SnifferError::Lookup(_) => ErrorCategory::Upstream,
            SnifferError::Config(_) => ErrorCategory::Configuration,
            SnifferError::System(_) => ErrorCategory::System,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SnifferError::Stream(err) => err.is_retryable(),
            _ => false,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SnifferError::Stream(err) => err.user_message(),
            SnifferError::Filter(err) => err.user_message(),
            SnifferError::Lookup(err) => err.user_message(),
            SnifferError::Config(err) => err.to_string(),
            SnifferError::System(err) => err.user_message(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SnifferError::Stream(err) => err.error_code(),
            SnifferError::Filter(err) => err.error_code(),
            SnifferError::Lookup(err) => err.error_code(),
            SnifferError::Config(err) => err.error_code(),
            SnifferError::System(err) => err.error_code(),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            SnifferError::Filter(FilterError::EvaluatorNotReady) => {
                "Filtering turns on once jq has started."
            }
            _ => self.category().recovery_hint(),
        }
    }
}

impl fmt::Display for SnifferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnifferError::Stream(err) => write!(f, "{}", err),
            SnifferError::Filter(err) => write!(f, "{}", err),
            SnifferError::Lookup(err) => write!(f, "{}", err),
            SnifferError::Config(err) => write!(f, "{}", err),
            SnifferError::System(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SnifferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnifferError::Stream(err) => Some(err),
            SnifferError::Filter(err) => Some(err),
            SnifferError::Lookup(err) => Some(err),
            SnifferError::Config(err) => Some(err),
            SnifferError::System(err) => Some(err),
        }
    }
}

impl From<StreamError> for SnifferError {
    fn from(err: StreamError) -> Self {
        SnifferError::Stream(err)
    }
}

impl From<FilterError> for SnifferError {
    fn from(err: FilterError) -> Self {
        SnifferError::Filter(err)
    }
}

impl From<EvaluationError> for SnifferError {
    fn from(err: EvaluationError) -> Self {
        SnifferError::Filter(FilterError::Evaluation(err))
    }
}

impl From<LookupError> for SnifferError {
    fn from(err: LookupError) -> Self {
        SnifferError::Lookup(err)
    }
}

impl From<ConfigError> for SnifferError {
    fn from(err: ConfigError) -> Self {
        SnifferError::Config(err)
    }
}

impl From<SystemError> for SnifferError {
    fn from(err: SystemError) -> Self {
        SnifferError::System(err)
    }
}

impl From<std::io::Error> for SnifferError {
    fn from(err: std::io::Error) -> Self {
        SnifferError::System(classify_io_error(err, None, "I/O operation"))
    }
}

impl From<serde_json::Error> for SnifferError {
    fn from(err: serde_json::Error) -> Self {
        SnifferError::Stream(StreamError::InvalidFrame {
            message: err.to_string(),
        })
    }
}
