//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`QueryEvaluator`] - The external jq-like predicate evaluator
//! - [`PacketFeed`] - The push channel delivering packet batches

pub mod evaluator;
pub mod feed;

pub use evaluator::{EvaluationError, QueryEvaluator};
pub use feed::PacketFeed;
