//! Packet feed integration for the App.
//!
//! Connects the feed, routes incoming batches to [`AppMessage::PacketBatch`]
//! and mirrors connection state changes.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::adapters::TungsteniteFeed;
use crate::error::StreamError;
use crate::traits::PacketFeed;
use crate::websocket::{backoff_secs, WsClientConfig, WsConnectionState};

use super::AppMessage;

/// Connect to the feed in the background and route it into the app.
///
/// The initial connection is retried on the same backoff schedule the client
/// uses for reconnects. If it never succeeds, [`AppMessage::FeedError`] is sent.
pub fn spawn_feed(config: WsClientConfig, message_tx: mpsc::UnboundedSender<AppMessage>) {
    tokio::spawn(async move {
        info!("Connecting to packet feed at {}", config.url);
        let mut attempt: u8 = 0;
        loop {
            match TungsteniteFeed::connect(config.clone()).await {
                Ok(feed) => {
                    route_feed(&feed, &message_tx).await;
                    feed.shutdown();
                    return;
                }
                Err(e) if attempt < config.max_retries => {
                    attempt += 1;
                    let backoff = backoff_secs(attempt, config.max_backoff_secs);
                    warn!(
                        "Failed to connect to feed: {}. Retrying in {}s ({}/{})",
                        e, backoff, attempt, config.max_retries
                    );
                    if message_tx
                        .send(AppMessage::WsReconnecting { attempt })
                        .is_err()
                    {
                        return;
                    }
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                }
                Err(e) => {
                    let err = StreamError::ConnectionFailed {
                        url: config.url.clone(),
                        message: e.to_string(),
                    };
                    error!("Giving up on packet feed: {}", err);
                    let _ = message_tx.send(AppMessage::FeedError(err));
                    return;
                }
            }
        }
    });
}

/// Forward batches and connection state from `feed` until it ends.
pub async fn route_feed<F>(feed: &F, message_tx: &mpsc::UnboundedSender<AppMessage>)
where
    F: PacketFeed + ?Sized,
{
    let mut batches = feed.subscribe();
    let mut state_rx = feed.state();

    // Report the state at subscription time
    let initial = state_rx.borrow_and_update().clone();
    if message_tx.send(state_message(initial)).is_err() {
        return;
    }

    loop {
        tokio::select! {
            batch = batches.recv() => {
                match batch {
                    Ok(batch) => {
                        if message_tx.send(AppMessage::PacketBatch(batch)).is_err() {
                            info!("App channel closed, stopping feed router");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Feed router lagged, {} batches dropped", skipped);
                    }
                    Err(RecvError::Closed) => {
                        info!("Feed batch channel closed");
                        let _ = message_tx.send(AppMessage::WsDisconnected);
                        break;
                    }
                }
            }

            changed = state_rx.changed() => {
                if changed.is_err() {
                    info!("Feed connection ended");
                    let _ = message_tx.send(AppMessage::WsDisconnected);
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                if message_tx.send(state_message(state)).is_err() {
                    break;
                }
            }
        }
    }
}

fn state_message(state: WsConnectionState) -> AppMessage {
    match state {
        WsConnectionState::Connected => AppMessage::WsConnected,
        WsConnectionState::Disconnected => AppMessage::WsDisconnected,
        WsConnectionState::Reconnecting { attempt } => AppMessage::WsReconnecting { attempt },
    }
}
