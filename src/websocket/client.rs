use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Notify};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::frame::decode_frame;
use crate::error::StreamError;
use crate::models::PacketBatch;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// WebSocket connection errors
#[derive(Debug, Clone)]
pub enum WsError {
    ConnectionFailed(String),
    Disconnected,
    ParseError(String),
}

impl std::fmt::Display for WsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WsError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            WsError::Disconnected => write!(f, "Disconnected from feed"),
            WsError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for WsError {}

/// WebSocket connection state
#[derive(Debug, Clone, PartialEq)]
pub enum WsConnectionState {
    Connected,
    Reconnecting { attempt: u8 },
    Disconnected,
}

/// Configuration for WebSocket client
#[derive(Debug, Clone, PartialEq)]
pub struct WsClientConfig {
    pub url: String,
    pub max_retries: u8,
    pub max_backoff_secs: u64,
}

impl Default for WsClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws".to_string(),
            max_retries: 5,
            max_backoff_secs: 30,
        }
    }
}

impl WsClientConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Backoff before reconnection `attempt` (1-based): 1s, 2s, 4s, ... capped.
pub fn backoff_secs(attempt: u8, max_backoff_secs: u64) -> u64 {
    let exp = u32::from(attempt.saturating_sub(1)).min(63);
    std::cmp::min(1u64 << exp, max_backoff_secs)
}

/// Receive-only WebSocket client for the packet feed
pub struct WsClient {
    /// Decoded batches in arrival order
    batch_rx: mpsc::Receiver<PacketBatch>,
    /// Watch receiver for connection state changes
    state_rx: watch::Receiver<WsConnectionState>,
    shutdown: ShutdownHandle,
}

/// Cloneable handle that stops a client's connection loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    /// Flag to signal shutdown
    flag: Arc<AtomicBool>,
    /// Wakes the connection loop when shutdown is requested
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            info!("Shutting down packet feed client");
        }
        self.notify.notify_one();
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl WsClient {
    /// Connect to the feed
    ///
    /// Returns a WsClient on success, or WsError if the initial connection fails
    pub async fn connect(config: WsClientConfig) -> Result<Self, WsError> {
        let (ws_stream, _) = connect_async(config.url.as_str())
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        info!("Connected to packet feed at {}", config.url);

        let (ws_sink, ws_source) = ws_stream.split();

        let (batch_tx, batch_rx) = mpsc::channel::<PacketBatch>(256);
        let (state_tx, state_rx) = watch::channel(WsConnectionState::Connected);

        let shutdown = ShutdownHandle::default();

        let connection = Connection {
            config,
            batch_tx,
            state_tx,
            shutdown: shutdown.clone(),
        };
        tokio::spawn(connection.run(ws_sink, ws_source));

        Ok(Self {
            batch_rx,
            state_rx,
            shutdown,
        })
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(*self.state_rx.borrow(), WsConnectionState::Connected)
    }

    /// Get the current connection state
    pub fn connection_state(&self) -> WsConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to connection state changes
    pub fn state_receiver(&self) -> watch::Receiver<WsConnectionState> {
        self.state_rx.clone()
    }

    /// Receive the next batch
    pub async fn recv(&mut self) -> Option<PacketBatch> {
        self.batch_rx.recv().await
    }

    /// Handle that can stop the connection after the client has been moved
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Gracefully shutdown the WebSocket connection
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Background half of the client, owned by the connection task
struct Connection {
    config: WsClientConfig,
    batch_tx: mpsc::Sender<PacketBatch>,
    state_tx: watch::Sender<WsConnectionState>,
    shutdown: ShutdownHandle,
}

enum FrameOutcome {
    Continue,
    Reconnect,
    Stop,
}

impl Connection {
    /// Run the main connection loop with reconnection logic
    async fn run(self, mut ws_sink: WsSink, mut ws_source: WsSource) {
        loop {
            if self.shutdown.is_shutdown() {
                debug!("Shutdown signal received, closing connection");
                let _ = ws_sink.close().await;
                break;
            }

            let outcome = tokio::select! {
                msg = ws_source.next() => self.handle_frame(msg, &mut ws_sink).await,
                _ = self.shutdown.notify.notified() => continue,
            };

            match outcome {
                FrameOutcome::Continue => {}
                FrameOutcome::Stop => break,
                FrameOutcome::Reconnect => {
                    let _ = self.state_tx.send(WsConnectionState::Disconnected);
                    match self.attempt_reconnect().await {
                        Some((new_sink, new_source)) => {
                            ws_sink = new_sink;
                            ws_source = new_source;
                            let _ = self.state_tx.send(WsConnectionState::Connected);
                        }
                        None => break,
                    }
                }
            }
        }

        info!("Connection loop ended");
        let _ = self.state_tx.send(WsConnectionState::Disconnected);
    }

    async fn handle_frame(
        &self,
        msg: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
        ws_sink: &mut WsSink,
    ) -> FrameOutcome {
        match msg {
            Some(Ok(Message::Text(text))) => self.forward(&text).await,
            Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                Ok(text) => self.forward(text).await,
                Err(e) => {
                    warn!("Skipping non UTF-8 binary frame ({} bytes): {}", data.len(), e);
                    FrameOutcome::Continue
                }
            },
            Some(Ok(Message::Ping(data))) => {
                debug!("Received ping, sending pong");
                let _ = ws_sink.send(Message::Pong(data)).await;
                FrameOutcome::Continue
            }
            Some(Ok(Message::Close(_))) => {
                info!("Received close frame from feed");
                FrameOutcome::Reconnect
            }
            Some(Ok(_)) => FrameOutcome::Continue,
            Some(Err(e)) => {
                let err = StreamError::ConnectionLost {
                    message: e.to_string(),
                };
                error!("{}", err);
                FrameOutcome::Reconnect
            }
            None => {
                info!("WebSocket stream ended");
                FrameOutcome::Reconnect
            }
        }
    }

    async fn forward(&self, text: &str) -> FrameOutcome {
        match decode_frame(text) {
            Ok(batch) => {
                debug!("Received batch of {} packets", batch.len());
                if self.batch_tx.send(batch).await.is_err() {
                    warn!("Batch channel closed, shutting down");
                    return FrameOutcome::Stop;
                }
            }
            Err(e) => {
                // Skip malformed frames, the connection stays up
                let err = StreamError::InvalidFrame {
                    message: e.to_string(),
                };
                warn!("{} - {}", err, preview(text));
            }
        }
        FrameOutcome::Continue
    }

    /// Attempt to reconnect with exponential backoff
    async fn attempt_reconnect(&self) -> Option<(WsSink, WsSource)> {
        let config = &self.config;
        for attempt in 1..=config.max_retries {
            if self.shutdown.is_shutdown() {
                debug!("Shutdown requested during reconnection");
                return None;
            }

            let _ = self.state_tx.send(WsConnectionState::Reconnecting { attempt });

            let backoff = backoff_secs(attempt, config.max_backoff_secs);
            info!(
                "Reconnection attempt {} of {}, waiting {}s",
                attempt, config.max_retries, backoff
            );

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(backoff)) => {}
                _ = self.shutdown.notify.notified() => {
                    debug!("Shutdown requested during backoff");
                    return None;
                }
            }

            match connect_async(config.url.as_str()).await {
                Ok((ws_stream, _)) => {
                    info!("Reconnected successfully on attempt {}", attempt);
                    return Some(ws_stream.split());
                }
                Err(e) => {
                    warn!("Reconnection attempt {} failed: {}", attempt, e);
                }
            }
        }

        let err = StreamError::RetriesExhausted {
            attempts: config.max_retries,
        };
        error!("{}, giving up", err);
        None
    }
}

/// First part of a frame, for log lines
fn preview(text: &str) -> &str {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
