//! Tungstenite-based packet feed adapter.
//!
//! Wraps [`WsClient`] and fans its batches out over a broadcast channel so the
//! feed can be consumed through the [`PacketFeed`] trait.

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::models::PacketBatch;
use crate::traits::PacketFeed;
use crate::websocket::{ShutdownHandle, WsClient, WsClientConfig, WsConnectionState, WsError};

/// Capacity of the batch broadcast channel. A subscriber that lags further
/// behind than this loses the oldest batches.
const BATCH_CHANNEL_CAPACITY: usize = 1024;

/// Packet feed adapter using tokio-tungstenite.
///
/// # Example
///
/// ```ignore
/// use sniffer::adapters::TungsteniteFeed;
/// use sniffer::traits::PacketFeed;
/// use sniffer::websocket::WsClientConfig;
///
/// let feed = TungsteniteFeed::connect(WsClientConfig::default()).await?;
/// let mut rx = feed.subscribe();
/// let batch = rx.recv().await?;
/// ```
pub struct TungsteniteFeed {
    batch_tx: broadcast::Sender<PacketBatch>,
    state_rx: watch::Receiver<WsConnectionState>,
    shutdown: ShutdownHandle,
}

impl TungsteniteFeed {
    /// Connect to the feed using the provided configuration.
    pub async fn connect(config: WsClientConfig) -> Result<Self, WsError> {
        let mut client = WsClient::connect(config).await?;
        let state_rx = client.state_receiver();
        let shutdown = client.shutdown_handle();
        let (batch_tx, _) = broadcast::channel(BATCH_CHANNEL_CAPACITY);

        // Forward batches from the client to the broadcast channel. The client
        // lives in this task and is dropped when its connection loop ends.
        let batch_tx_for_task = batch_tx.clone();
        tokio::spawn(async move {
            while let Some(batch) = client.recv().await {
                // Ignore send errors (no subscribers)
                let _ = batch_tx_for_task.send(batch);
            }
            debug!("Feed forwarder stopped");
        });

        Ok(Self {
            batch_tx,
            state_rx,
            shutdown,
        })
    }
}

impl PacketFeed for TungsteniteFeed {
    fn subscribe(&self) -> broadcast::Receiver<PacketBatch> {
        self.batch_tx.subscribe()
    }

    fn state(&self) -> watch::Receiver<WsConnectionState> {
        self.state_rx.clone()
    }

    fn shutdown(&self) {
        self.shutdown.shutdown();
    }
}

impl Drop for TungsteniteFeed {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}
