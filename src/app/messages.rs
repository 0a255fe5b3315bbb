//! AppMessage enum for async communication within the application.

use crate::error::StreamError;
use crate::filter::EvaluationOutcome;
use crate::models::PacketBatch;

/// Messages received from async operations (feed, evaluator)
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A batch of packets arrived on the feed
    PacketBatch(PacketBatch),
    /// Feed connection established (or re-established)
    WsConnected,
    /// Feed connection lost
    WsDisconnected,
    /// Feed reconnection in progress
    WsReconnecting { attempt: u8 },
    /// The feed could not be reached
    FeedError(StreamError),
    /// The predicate evaluator passed its readiness probe
    EvaluatorReady,
    /// The predicate evaluator is not usable
    EvaluatorUnavailable(String),
    /// A filter evaluation finished
    FilterEvaluated(EvaluationOutcome),
}
