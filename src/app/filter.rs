//! Evaluator integration for the App.
//!
//! A single worker task runs evaluation requests one at a time, in the order
//! they were submitted, and reports each outcome as an [`AppMessage`]. Requests
//! for a predicate that has since been replaced are skipped without running.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::filter::EvaluationRequest;
use crate::traits::QueryEvaluator;

use super::AppMessage;

/// Submission side of the evaluation worker.
#[derive(Debug, Clone)]
pub struct EvaluationQueue {
    tx: mpsc::UnboundedSender<EvaluationRequest>,
    /// Highest generation submitted so far
    latest: Arc<AtomicU64>,
}

/// Receiving side, consumed by [`run_evaluation_worker`].
pub struct EvaluationInbox {
    rx: mpsc::UnboundedReceiver<EvaluationRequest>,
    latest: Arc<AtomicU64>,
}

impl EvaluationQueue {
    pub fn new() -> (Self, EvaluationInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));
        (
            Self {
                tx,
                latest: latest.clone(),
            },
            EvaluationInbox { rx, latest },
        )
    }

    /// Queue a request. Returns false if the worker is gone.
    pub fn submit(&self, request: EvaluationRequest) -> bool {
        self.latest.fetch_max(request.generation, Ordering::SeqCst);
        debug!(
            "Queued evaluation of {} records at {} (generation {})",
            request.records.len(),
            request.start,
            request.generation
        );
        self.tx.send(request).is_ok()
    }

    /// Mark every request older than `generation` as superseded without
    /// queueing new work.
    pub fn supersede(&self, generation: u64) {
        let previous = self.latest.fetch_max(generation, Ordering::SeqCst);
        if previous < generation {
            debug!("Evaluations before generation {} superseded", generation);
        }
    }
}

impl EvaluationInbox {
    /// Next request that is still current, skipping superseded ones.
    pub async fn next(&mut self) -> Option<EvaluationRequest> {
        while let Some(request) = self.rx.recv().await {
            let latest = self.latest.load(Ordering::SeqCst);
            if request.generation < latest {
                debug!(
                    "Skipping superseded evaluation (generation {}, latest {})",
                    request.generation, latest
                );
                continue;
            }
            return Some(request);
        }
        None
    }
}

/// Run requests until the queue or the app channel closes.
pub async fn run_evaluation_worker(
    mut inbox: EvaluationInbox,
    evaluator: Arc<dyn QueryEvaluator>,
    message_tx: mpsc::UnboundedSender<AppMessage>,
) {
    while let Some(request) = inbox.next().await {
        let outcome = request.run(evaluator.as_ref()).await;
        if message_tx.send(AppMessage::FilterEvaluated(outcome)).is_err() {
            debug!("App channel closed, stopping evaluation worker");
            break;
        }
    }
    debug!("Evaluation worker stopped");
}

/// Probe the evaluator and report readiness.
pub async fn probe_evaluator(
    evaluator: &dyn QueryEvaluator,
    message_tx: &mpsc::UnboundedSender<AppMessage>,
) {
    let message = match evaluator.probe().await {
        Ok(()) => {
            info!("Filter evaluator ready");
            AppMessage::EvaluatorReady
        }
        Err(e) => {
            warn!("Filter evaluator unavailable: {}", e);
            AppMessage::EvaluatorUnavailable(e.to_string())
        }
    };
    let _ = message_tx.send(message);
}

/// Spawn the readiness probe and the worker; returns the queue to submit to.
pub fn start_evaluator(
    evaluator: Arc<dyn QueryEvaluator>,
    message_tx: mpsc::UnboundedSender<AppMessage>,
) -> EvaluationQueue {
    let (queue, inbox) = EvaluationQueue::new();

    let probe_evaluator_ref = evaluator.clone();
    let probe_tx = message_tx.clone();
    tokio::spawn(async move {
        probe_evaluator(probe_evaluator_ref.as_ref(), &probe_tx).await;
    });

    tokio::spawn(run_evaluation_worker(inbox, evaluator, message_tx));
    queue
}
