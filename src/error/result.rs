//! Result type alias for viewer operations.

use super::sniffer_error::SnifferError;

/// Type alias for Results using [`SnifferError`].
pub type SnifferResult<T> = Result<T, SnifferError>;
