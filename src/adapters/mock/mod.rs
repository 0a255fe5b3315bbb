//! Mock implementations for testing.
//!
//! These implement the trait abstractions without a network or an external
//! process.
//!
//! # Available Mocks
//!
//! - [`MockFeed`] - Packet feed with batch injection
//! - [`MockEvaluator`] - Query evaluator driven by Rust closures

pub mod evaluator;
pub mod websocket;

pub use evaluator::{EvaluatorCall, MockEvaluator, RecordMatcher};
pub use websocket::MockFeed;
