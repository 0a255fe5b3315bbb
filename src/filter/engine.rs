use tracing::{debug, info, warn};

use super::program::evaluate;
use crate::models::Record;
use crate::traits::{EvaluationError, QueryEvaluator};

/// Attempts at one slice before a transient failure fails the predicate.
pub const MAX_SLICE_ATTEMPTS: u32 = 3;

/// Work order for the evaluator: run the current predicate over `records`,
/// which start at corpus slot `start`.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub generation: u64,
    pub start: usize,
    pub predicate: String,
    pub records: Vec<Record>,
}

/// Result of an [`EvaluationRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub generation: u64,
    pub start: usize,
    /// Number of records that were evaluated
    pub len: usize,
    pub result: Result<Vec<bool>, EvaluationError>,
}

impl EvaluationRequest {
    /// Run the request against `evaluator`.
    pub async fn run<E>(self, evaluator: &E) -> EvaluationOutcome
    where
        E: QueryEvaluator + ?Sized,
    {
        let result = evaluate(evaluator, &self.records, &self.predicate).await;
        EvaluationOutcome {
            generation: self.generation,
            start: self.start,
            len: self.records.len(),
            result,
        }
    }
}

/// Summary of the engine for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStatus {
    /// No predicate; every record is visible.
    Unfiltered,
    /// A predicate is set but its mask does not cover the corpus yet.
    Pending,
    /// The mask covers the corpus.
    Applied { matched: usize },
    /// The predicate failed to evaluate; the previous view stays in effect.
    Failed { message: String },
}

#[derive(Debug, Clone)]
struct Mask {
    generation: u64,
    values: Vec<bool>,
    matched: usize,
}

impl Mask {
    fn new(generation: u64, values: Vec<bool>) -> Self {
        let matched = values.iter().filter(|&&v| v).count();
        Self {
            generation,
            values,
            matched,
        }
    }

    fn extend(&mut self, values: Vec<bool>) {
        self.matched += values.iter().filter(|&&v| v).count();
        self.values.extend(values);
    }
}

/// Incremental predicate evaluation state.
///
/// The engine never calls the evaluator itself. [`set_predicate`] and
/// [`on_ingest`] return the evaluation to perform, and the caller hands the
/// outcome back through [`apply_outcome`], possibly much later.
///
/// A predicate change bumps the generation; outcomes from older generations
/// are dropped, so the latest predicate always wins. Until the new predicate
/// produces its first mask, the previous mask stays in effect.
///
/// A slice that fails because of the predicate (a jq runtime error on some
/// record, output of the wrong shape) fails the predicate outright. Transient
/// failures are retried from the end of the mask, at most
/// [`MAX_SLICE_ATTEMPTS`] times at the same slot.
///
/// [`set_predicate`]: FilterEngine::set_predicate
/// [`on_ingest`]: FilterEngine::on_ingest
/// [`apply_outcome`]: FilterEngine::apply_outcome
#[derive(Debug, Default)]
pub struct FilterEngine {
    predicate: String,
    generation: u64,
    mask: Option<Mask>,
    /// Corpus length already covered by issued requests
    requested_until: usize,
    failure: Option<String>,
    /// Slot of the slice that last failed transiently, and how many times
    slice_failures: Option<(usize, u32)>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active predicate text (empty when unfiltered).
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        !self.predicate.is_empty()
    }

    /// Replace the predicate.
    ///
    /// An empty (or blank) predicate drops the mask immediately. Anything else
    /// requests a full evaluation over `corpus`.
    pub fn set_predicate(&mut self, text: &str, corpus: &[Record]) -> Option<EvaluationRequest> {
        self.generation += 1;
        self.failure = None;
        self.slice_failures = None;
        self.predicate = text.trim().to_string();

        if self.predicate.is_empty() {
            info!("Filter cleared");
            self.mask = None;
            self.requested_until = 0;
            return None;
        }

        info!(
            "Filter set to {:?} (generation {}), evaluating {} records",
            self.predicate,
            self.generation,
            corpus.len()
        );
        self.requested_until = corpus.len();
        Some(self.request(0, corpus))
    }

    /// Request evaluation of records appended since the last request.
    pub fn on_ingest(&mut self, corpus: &[Record]) -> Option<EvaluationRequest> {
        if !self.is_active() || self.failure.is_some() || self.requested_until >= corpus.len() {
            return None;
        }
        let start = self.requested_until;
        self.requested_until = corpus.len();
        Some(self.request(start, &corpus[start..]))
    }

    fn request(&self, start: usize, records: &[Record]) -> EvaluationRequest {
        EvaluationRequest {
            generation: self.generation,
            start,
            predicate: self.predicate.clone(),
            records: records.to_vec(),
        }
    }

    /// Fold an evaluation outcome into the mask. Returns whether the mask changed.
    pub fn apply_outcome(&mut self, outcome: EvaluationOutcome) -> bool {
        if outcome.generation != self.generation || !self.is_active() {
            debug!(
                "Discarding stale evaluation (generation {}, current {})",
                outcome.generation, self.generation
            );
            return false;
        }
        if self.failure.is_some() {
            debug!("Discarding evaluation after failure");
            return false;
        }

        let values = match outcome.result {
            Ok(values) if values.len() == outcome.len => values,
            Ok(values) => {
                let err = EvaluationError::InvalidOutput {
                    message: format!("expected {} results, got {}", outcome.len, values.len()),
                };
                return self.record_failure(outcome.start, err);
            }
            Err(err) => return self.record_failure(outcome.start, err),
        };

        if outcome.start == 0 {
            debug!("Filter mask replaced ({} records)", values.len());
            self.mask = Some(Mask::new(self.generation, values));
            return true;
        }

        let generation = self.generation;
        match self.mask.as_mut() {
            Some(mask) if mask.generation == generation && mask.values.len() == outcome.start => {
                debug!(
                    "Filter mask extended by {} at {}",
                    values.len(),
                    outcome.start
                );
                mask.extend(values);
                self.slice_failures = None;
                true
            }
            _ => {
                debug!("Discarding out-of-place evaluation at {}", outcome.start);
                self.rewind();
                false
            }
        }
    }

    fn record_failure(&mut self, start: usize, err: EvaluationError) -> bool {
        if start == 0 || err.is_user_error() {
            return self.fail(err);
        }

        let attempts = match self.slice_failures {
            Some((at, attempts)) if at == start => attempts + 1,
            _ => 1,
        };
        if attempts >= MAX_SLICE_ATTEMPTS {
            warn!(
                "Filter evaluation at {} failed {} times, giving up",
                start, attempts
            );
            return self.fail(err);
        }

        // The next ingest re-requests from the end of the mask
        warn!(
            "Filter evaluation at {} failed ({}/{}): {}",
            start, attempts, MAX_SLICE_ATTEMPTS, err
        );
        self.slice_failures = Some((start, attempts));
        self.rewind();
        false
    }

    fn fail(&mut self, err: EvaluationError) -> bool {
        warn!("Filter {:?} failed: {}", self.predicate, err);
        self.failure = Some(err.to_string());
        self.slice_failures = None;
        true
    }

    fn rewind(&mut self) {
        let generation = self.generation;
        self.requested_until = match &self.mask {
            Some(mask) if mask.generation == generation => mask.values.len(),
            _ => 0,
        };
    }

    /// The mask, if one is in effect and covers exactly `corpus_len` records.
    pub fn current_mask(&self, corpus_len: usize) -> Option<&[bool]> {
        self.mask
            .as_ref()
            .filter(|m| m.values.len() == corpus_len)
            .map(|m| m.values.as_slice())
    }

    /// Length of the mask in effect, if any.
    pub fn mask_len(&self) -> Option<usize> {
        self.mask.as_ref().map(|m| m.values.len())
    }

    pub fn status(&self, corpus_len: usize) -> FilterStatus {
        if !self.is_active() {
            return FilterStatus::Unfiltered;
        }
        if let Some(message) = &self.failure {
            return FilterStatus::Failed {
                message: message.clone(),
            };
        }
        match &self.mask {
            Some(mask) if mask.generation == self.generation && mask.values.len() == corpus_len => {
                FilterStatus::Applied {
                    matched: mask.matched,
                }
            }
            _ => FilterStatus::Pending,
        }
    }
}
