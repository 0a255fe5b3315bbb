//! Query evaluator trait abstraction.
//!
//! The viewer does not implement the filter language itself. It hands a
//! program and a JSON input to an evaluator and gets JSON back, the way one
//! would pipe a document through `jq`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by an evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The evaluator binary/library could not be started.
    #[error("evaluator not available: {command}")]
    Unavailable { command: String },

    /// The evaluator did not finish in time.
    #[error("evaluation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The evaluator rejected the program or failed while running it.
    #[error("evaluation failed: {message}")]
    Failed { message: String },

    /// The evaluator produced output of the wrong shape.
    #[error("unexpected evaluator output: {message}")]
    InvalidOutput { message: String },
}

impl EvaluationError {
    /// Whether the error is most likely caused by the predicate text.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EvaluationError::Failed { .. } | EvaluationError::InvalidOutput { .. }
        )
    }
}

/// Trait for running a jq-like program against a JSON input.
///
/// # Example
///
/// ```ignore
/// use sniffer::traits::QueryEvaluator;
///
/// async fn first_ids<E: QueryEvaluator>(evaluator: &E, input: &serde_json::Value) {
///     evaluator.probe().await?;
///     let ids = evaluator.run(input, "[.[] | .id]").await?;
/// }
/// ```
#[async_trait]
pub trait QueryEvaluator: Send + Sync {
    /// Check that the evaluator can run at all.
    ///
    /// The viewer does not accept predicates until this has succeeded.
    async fn probe(&self) -> Result<(), EvaluationError>;

    /// Run `program` with `input` as its input document and return the single
    /// JSON value it produces.
    async fn run(&self, input: &Value, program: &str) -> Result<Value, EvaluationError>;
}
