//! Concrete implementations of trait abstractions.
//!
//! Production adapters implement the traits in `crate::traits` on top of real
//! I/O, so the application can be wired with mocks in tests.
//!
//! # Adapters
//!
//! - [`JqCommandEvaluator`] - Predicate evaluation through an external `jq`
//! - [`TungsteniteFeed`] - Packet feed over tokio-tungstenite
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockEvaluator`] - Closure-based predicate matching
//! - [`mock::MockFeed`] - Batch injection for testing

pub mod jq_command;
pub mod mock;
pub mod tungstenite_ws;

pub use jq_command::{JqCommandEvaluator, DEFAULT_JQ_TIMEOUT};
pub use mock::{MockEvaluator, MockFeed};
pub use tungstenite_ws::TungsteniteFeed;
