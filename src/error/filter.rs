//! Filter errors.

use std::fmt;

use crate::traits::EvaluationError;

/// Errors from applying a filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The evaluator has not finished its readiness probe.
    EvaluatorNotReady,

    /// The evaluator probe failed; filtering is unavailable for this session.
    EvaluatorUnavailable { reason: String },

    /// The evaluator rejected the predicate or failed while running it.
    Evaluation(EvaluationError),
}

impl FilterError {
    pub fn user_message(&self) -> String {
        match self {
            FilterError::EvaluatorNotReady => {
                "The filter engine is still starting. Try again in a moment.".to_string()
            }
            FilterError::EvaluatorUnavailable { reason } => {
                format!("Filtering is unavailable: {}", reason)
            }
            FilterError::Evaluation(err) => format!("Filter failed: {}", err),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FilterError::EvaluatorNotReady => "FILTER_NOT_READY",
            FilterError::EvaluatorUnavailable { .. } => "FILTER_UNAVAILABLE",
            FilterError::Evaluation(_) => "FILTER_EVAL",
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::EvaluatorNotReady => write!(f, "Evaluator not ready"),
            FilterError::EvaluatorUnavailable { reason } => {
                write!(f, "Evaluator unavailable: {}", reason)
            }
            FilterError::Evaluation(err) => write!(f, "Evaluation error: {}", err),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Evaluation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvaluationError> for FilterError {
    fn from(err: EvaluationError) -> Self {
        FilterError::Evaluation(err)
    }
}
