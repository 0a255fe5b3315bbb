//! Mock query evaluator for testing.
//!
//! Instead of a query language, the mock matches records with Rust closures
//! registered per predicate text.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::traits::{EvaluationError, QueryEvaluator};

/// Record matcher used in place of a real predicate.
pub type RecordMatcher = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// One recorded `run` call.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorCall {
    pub program: String,
    pub input_len: usize,
}

#[derive(Default)]
struct MockState {
    matchers: HashMap<String, RecordMatcher>,
    available: bool,
    fail_with: Option<EvaluationError>,
    output_override: Option<Value>,
    delay: Option<Duration>,
    calls: Vec<EvaluatorCall>,
}

/// Mock evaluator for testing.
///
/// `run` expects the program built by the filter engine, finds the registered
/// predicate it embeds and applies the matcher to every element of the input
/// array. Unknown predicates fail like a jq syntax error.
///
/// # Example
///
/// ```ignore
/// use sniffer::adapters::mock::MockEvaluator;
///
/// let mock = MockEvaluator::new()
///     .with_predicate(r#".type == "TCP""#, |r| r["type"] == "TCP");
/// ```
#[derive(Clone)]
pub struct MockEvaluator {
    state: Arc<Mutex<MockState>>,
}

impl MockEvaluator {
    /// Create an available mock with no predicates.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                available: true,
                ..MockState::default()
            })),
        }
    }

    /// Create a mock whose probe fails.
    pub fn unavailable() -> Self {
        let mock = Self::new();
        if let Ok(mut state) = mock.state.try_lock() {
            state.available = false;
        }
        mock
    }

    /// Register a matcher for a predicate text.
    pub fn with_predicate<F>(self, predicate: &str, matcher: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        if let Ok(mut state) = self.state.try_lock() {
            state
                .matchers
                .insert(predicate.trim().to_string(), Arc::new(matcher));
        }
        self
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`).
    pub async fn set_failure(&self, error: Option<EvaluationError>) {
        self.state.lock().await.fail_with = error;
    }

    /// Return `value` from every subsequent run instead of evaluating.
    pub async fn set_output_override(&self, value: Option<Value>) {
        self.state.lock().await.output_override = value;
    }

    /// Delay every run by `delay`.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().await.delay = delay;
    }

    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
    }

    /// All `run` calls so far.
    pub async fn calls(&self) -> Vec<EvaluatorCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryEvaluator for MockEvaluator {
    async fn probe(&self) -> Result<(), EvaluationError> {
        if self.state.lock().await.available {
            Ok(())
        } else {
            Err(EvaluationError::Unavailable {
                command: "mock".to_string(),
            })
        }
    }

    async fn run(&self, input: &Value, program: &str) -> Result<Value, EvaluationError> {
        let (delay, outcome) = {
            let mut state = self.state.lock().await;
            let input_len = input.as_array().map_or(0, Vec::len);
            state.calls.push(EvaluatorCall {
                program: program.to_string(),
                input_len,
            });

            let outcome = if let Some(err) = state.fail_with.clone() {
                Err(err)
            } else if let Some(value) = state.output_override.clone() {
                Ok(value)
            } else {
                let matcher = state
                    .matchers
                    .iter()
                    .find(|(predicate, _)| program.contains(&format!("({})", predicate)))
                    .map(|(_, matcher)| matcher.clone());
                match (matcher, input.as_array()) {
                    (Some(matcher), Some(records)) => Ok(Value::Array(
                        records.iter().map(|r| Value::Bool(matcher(r))).collect(),
                    )),
                    (Some(_), None) => Err(EvaluationError::Failed {
                        message: "Cannot iterate over non-array input".to_string(),
                    }),
                    (None, _) => Err(EvaluationError::Failed {
                        message: format!("jq: error: unknown program {}", program),
                    }),
                }
            };
            (state.delay, outcome)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
