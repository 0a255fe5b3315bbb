//! Feed (ingress channel) errors.

use std::fmt;

/// Errors on the packet feed.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Initial connection could not be established.
    ConnectionFailed { url: String, message: String },

    /// An established connection dropped.
    ConnectionLost { message: String },

    /// Reconnection gave up after the configured number of attempts.
    RetriesExhausted { attempts: u8 },

    /// A frame was not a JSON array of packet records.
    InvalidFrame { message: String },
}

impl StreamError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ConnectionFailed { .. } | StreamError::ConnectionLost { .. }
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionFailed { url, .. } => {
                format!("Could not connect to the packet feed at {}.", url)
            }
            StreamError::ConnectionLost { .. } => {
                "Connection to the packet feed was lost. Reconnecting...".to_string()
            }
            StreamError::RetriesExhausted { attempts } => {
                format!("Gave up reconnecting after {} attempts.", attempts)
            }
            StreamError::InvalidFrame { .. } => {
                "Skipped a malformed message from the packet feed.".to_string()
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionFailed { .. } => "STREAM_CONNECT",
            StreamError::ConnectionLost { .. } => "STREAM_LOST",
            StreamError::RetriesExhausted { .. } => "STREAM_RETRIES",
            StreamError::InvalidFrame { .. } => "STREAM_FRAME",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionFailed { url, message } => {
                write!(f, "Connection to {} failed: {}", url, message)
            }
            StreamError::ConnectionLost { message } => write!(f, "Connection lost: {}", message),
            StreamError::RetriesExhausted { attempts } => {
                write!(f, "Reconnection failed after {} attempts", attempts)
            }
            StreamError::InvalidFrame { message } => write!(f, "Invalid frame: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
