//! View controller composing the store, the filter engine and the selection.
//!
//! This is the single writer for the corpora and the mask. Everything the UI
//! shows is read through it: the visible window, the selected packet's detail
//! and the filter status.

use tracing::debug;

use crate::error::{FilterError, LookupError};
use crate::filter::{EvaluationOutcome, EvaluationRequest, FilterEngine, FilterStatus};
use crate::models::{PacketBatch, Record};
use crate::store::{StreamStore, DISPLAY_WINDOW};

/// Readiness of the external predicate evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EvaluatorState {
    /// The readiness probe has not completed yet.
    #[default]
    NotReady,
    Ready,
    /// The probe failed; filtering stays disabled.
    Unavailable(String),
}

/// Store + filter + selection.
#[derive(Debug)]
pub struct ViewController {
    store: StreamStore,
    filter: FilterEngine,
    selection: Option<u64>,
    evaluator: EvaluatorState,
    window: usize,
}

impl ViewController {
    pub fn new() -> Self {
        Self::with_window(DISPLAY_WINDOW)
    }

    /// Create a controller that shows at most `window` records.
    pub fn with_window(window: usize) -> Self {
        Self {
            store: StreamStore::new(),
            filter: FilterEngine::new(),
            selection: None,
            evaluator: EvaluatorState::NotReady,
            window,
        }
    }

    pub fn store(&self) -> &StreamStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn evaluator_state(&self) -> &EvaluatorState {
        &self.evaluator
    }

    pub fn set_evaluator_state(&mut self, state: EvaluatorState) {
        debug!("Evaluator state: {:?}", state);
        self.evaluator = state;
    }

    pub fn evaluator_ready(&self) -> bool {
        self.evaluator == EvaluatorState::Ready
    }

    /// Append a batch and return the incremental evaluation it needs, if any.
    pub fn ingest(&mut self, batch: PacketBatch) -> Option<EvaluationRequest> {
        self.store.ingest(batch);
        self.filter.on_ingest(self.store.records())
    }

    /// Replace the filter predicate.
    ///
    /// The empty predicate is always accepted. Anything else requires a ready
    /// evaluator and returns the full evaluation to run.
    pub fn set_predicate(&mut self, text: &str) -> Result<Option<EvaluationRequest>, FilterError> {
        if !text.trim().is_empty() {
            match &self.evaluator {
                EvaluatorState::Ready => {}
                EvaluatorState::NotReady => return Err(FilterError::EvaluatorNotReady),
                EvaluatorState::Unavailable(reason) => {
                    return Err(FilterError::EvaluatorUnavailable {
                        reason: reason.clone(),
                    })
                }
            }
        }
        Ok(self.filter.set_predicate(text, self.store.records()))
    }

    /// Fold an evaluation result in. Returns whether the mask changed.
    pub fn apply_evaluation(&mut self, outcome: EvaluationOutcome) -> bool {
        self.filter.apply_outcome(outcome)
    }

    pub fn filter_status(&self) -> FilterStatus {
        self.filter.status(self.store.len())
    }

    /// The last `window` records of the filtered corpus, oldest first.
    ///
    /// The mask is applied only while it covers the whole corpus. A lagging
    /// mask shows the unfiltered superset instead of hiding new records.
    pub fn visible_records(&self) -> Vec<&Record> {
        let records = self.store.records();
        match self.filter.current_mask(records.len()) {
            Some(mask) => {
                let mut visible: Vec<&Record> = records
                    .iter()
                    .zip(mask)
                    .rev()
                    .filter(|&(_, &keep)| keep)
                    .map(|(record, _)| record)
                    .take(self.window)
                    .collect();
                visible.reverse();
                visible
            }
            None => self.store.window(self.window).iter().collect(),
        }
    }

    /// Number of records passing the filter (the whole corpus when unfiltered).
    pub fn matched_len(&self) -> usize {
        match self.filter_status() {
            FilterStatus::Applied { matched } => matched,
            _ => match self.filter.current_mask(self.store.len()) {
                Some(mask) => mask.iter().filter(|&&keep| keep).count(),
                None => self.store.len(),
            },
        }
    }

    pub fn selection(&self) -> Option<u64> {
        self.selection
    }

    /// Select `id`, or clear the selection if `id` is already selected.
    pub fn toggle_selection(&mut self, id: u64) {
        self.selection = if self.selection == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Record and raw payload for `id`.
    pub fn detail(&self, id: u64) -> Result<(&Record, &[u8]), LookupError> {
        let slot = self.store.resolve_by_id(id)?;
        match (self.store.record_at(slot), self.store.raw_at(slot)) {
            (Some(record), Some(raw)) => Ok((record, raw)),
            _ => Err(LookupError::NotFound { id }),
        }
    }

    /// Detail of the current selection, or `None` when nothing is selected or
    /// the selected id does not resolve.
    pub fn selected_detail(&self) -> Option<(&Record, &[u8])> {
        let id = self.selection?;
        match self.detail(id) {
            Ok(detail) => Some(detail),
            Err(err) => {
                debug!("No detail for selection: {}", err);
                None
            }
        }
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}
