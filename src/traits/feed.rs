//! Packet feed trait abstraction.
//!
//! The feed is a push channel: batches arrive whenever upstream captures them.
//! Consumers subscribe to batches and watch the connection state.

use tokio::sync::{broadcast, watch};

use crate::models::PacketBatch;
use crate::websocket::WsConnectionState;

/// Trait for a source of packet batches.
///
/// # Example
///
/// ```ignore
/// use sniffer::traits::PacketFeed;
///
/// async fn drain<F: PacketFeed>(feed: &F) {
///     let mut rx = feed.subscribe();
///     while let Ok(batch) = rx.recv().await {
///         println!("{} packets", batch.len());
///     }
/// }
/// ```
pub trait PacketFeed: Send + Sync {
    /// Subscribe to incoming batches.
    ///
    /// Each subscriber receives every batch published after it subscribed.
    fn subscribe(&self) -> broadcast::Receiver<PacketBatch>;

    /// Get a receiver for connection state changes.
    fn state(&self) -> watch::Receiver<WsConnectionState>;

    /// Close the connection and stop reconnecting.
    fn shutdown(&self);
}
