//! Mock packet feed for testing.
//!
//! Provides a feed that lets tests inject batches and drive the connection
//! state without a network.

use tokio::sync::{broadcast, watch};

use crate::models::PacketBatch;
use crate::traits::PacketFeed;
use crate::websocket::WsConnectionState;

/// Mock packet feed for testing.
///
/// This mock allows:
/// - Injecting batches
/// - Controlling connection state
///
/// # Example
///
/// ```ignore
/// use sniffer::adapters::mock::MockFeed;
/// use sniffer::traits::PacketFeed;
///
/// let mock = MockFeed::new();
/// let mut rx = mock.subscribe();
/// mock.inject_batch(vec![]);
/// let batch = rx.recv().await?;
/// ```
#[derive(Clone)]
pub struct MockFeed {
    batch_tx: broadcast::Sender<PacketBatch>,
    state_tx: watch::Sender<WsConnectionState>,
    state_rx: watch::Receiver<WsConnectionState>,
}

impl MockFeed {
    /// Create a new mock feed in connected state.
    pub fn new() -> Self {
        Self::with_state(WsConnectionState::Connected)
    }

    /// Create a new mock feed in disconnected state.
    pub fn disconnected() -> Self {
        Self::with_state(WsConnectionState::Disconnected)
    }

    fn with_state(state: WsConnectionState) -> Self {
        let (batch_tx, _) = broadcast::channel(100);
        let (state_tx, state_rx) = watch::channel(state);
        Self {
            batch_tx,
            state_tx,
            state_rx,
        }
    }

    /// Inject a batch. It is delivered to all subscribers.
    pub fn inject_batch(&self, batch: PacketBatch) {
        // Ignore send errors (no subscribers)
        let _ = self.batch_tx.send(batch);
    }

    /// Inject several batches in order.
    pub fn inject_batches(&self, batches: Vec<PacketBatch>) {
        for batch in batches {
            self.inject_batch(batch);
        }
    }

    /// Set the connection state.
    pub fn set_state(&self, state: WsConnectionState) {
        let _ = self.state_tx.send(state);
    }

    /// Simulate a disconnection.
    pub fn simulate_disconnect(&self) {
        self.set_state(WsConnectionState::Disconnected);
    }

    /// Simulate a reconnection attempt.
    pub fn simulate_reconnecting(&self, attempt: u8) {
        self.set_state(WsConnectionState::Reconnecting { attempt });
    }

    /// Simulate a successful reconnection.
    pub fn simulate_reconnected(&self) {
        self.set_state(WsConnectionState::Connected);
    }

    /// Get the number of batch subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.batch_tx.receiver_count()
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketFeed for MockFeed {
    fn subscribe(&self) -> broadcast::Receiver<PacketBatch> {
        self.batch_tx.subscribe()
    }

    fn state(&self) -> watch::Receiver<WsConnectionState> {
        self.state_rx.clone()
    }

    fn shutdown(&self) {
        let _ = self.state_tx.send(WsConnectionState::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRecord, Record};

    fn batch(ids: &[u64]) -> PacketBatch {
        ids.iter()
            .map(|&id| RawRecord::new(Record::new(id), vec![]))
            .collect()
    }

    #[test]
    fn test_mock_feed_new() {
        let mock = MockFeed::new();
        assert_eq!(*mock.state().borrow(), WsConnectionState::Connected);
        assert_eq!(
            *MockFeed::disconnected().state().borrow(),
            WsConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn test_inject_batches_in_order() {
        let mock = MockFeed::new();
        let mut rx = mock.subscribe();

        mock.inject_batches(vec![batch(&[1, 2]), batch(&[3])]);

        assert_eq!(rx.recv().await.unwrap().len(), 2);
        assert_eq!(rx.recv().await.unwrap()[0].record.id, 3);
    }

    #[test]
    fn test_inject_without_subscribers() {
        let mock = MockFeed::new();
        mock.inject_batch(batch(&[1]));
        assert_eq!(mock.subscriber_count(), 0);
    }

    #[test]
    fn test_simulate_disconnect_reconnect() {
        let mock = MockFeed::new();
        let state = mock.state();

        mock.simulate_disconnect();
        assert_eq!(*state.borrow(), WsConnectionState::Disconnected);

        mock.simulate_reconnecting(2);
        assert_eq!(*state.borrow(), WsConnectionState::Reconnecting { attempt: 2 });

        mock.simulate_reconnected();
        assert_eq!(*state.borrow(), WsConnectionState::Connected);
    }

    #[test]
    fn test_clone_shares_channels() {
        let mock = MockFeed::new();
        let cloned = mock.clone();
        let _rx = cloned.subscribe();
        assert_eq!(mock.subscriber_count(), 1);

        mock.shutdown();
        assert_eq!(*cloned.state().borrow(), WsConnectionState::Disconnected);
    }
}
