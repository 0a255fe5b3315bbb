//! Error handling for the viewer.
//!
//! Domain errors (`StreamError`, `FilterError`, `LookupError`, `ConfigError`,
//! `SystemError`) convert into the unified [`SnifferError`], which classifies
//! itself with an [`ErrorCategory`] and provides a user-facing message.
//!
//! | Category | Example | Retryable |
//! |----------|---------|-----------|
//! | Network | feed connection dropped | Yes |
//! | Upstream | malformed frame, unknown id | No |
//! | User | malformed filter predicate | No |
//! | Dependency | jq missing or timing out | No |
//! | System | log directory not writable | No |
//! | Configuration | unknown CLI flag | No |

mod category;
mod config;
mod filter;
mod lookup;
mod result;
mod sniffer_error;
mod stream;
mod system;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use filter::FilterError;
pub use lookup::LookupError;
pub use result::SnifferResult;
pub use sniffer_error::SnifferError;
pub use stream::StreamError;
pub use system::{classify_io_error, SystemError};
