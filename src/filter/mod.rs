//! Predicate filtering over the packet corpus.
//!
//! The filter language is whatever the injected
//! [`QueryEvaluator`](crate::traits::QueryEvaluator) implements (jq in
//! production). This module builds the evaluation program, validates the
//! evaluator's output and maintains the boolean mask incrementally.

mod engine;
mod program;

pub use engine::{
    EvaluationOutcome, EvaluationRequest, FilterEngine, FilterStatus, MAX_SLICE_ATTEMPTS,
};
pub use program::{build_program, evaluate};
