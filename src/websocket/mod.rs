//! WebSocket client for the packet feed.
//!
//! The client connects to the sniffer's push endpoint, decodes every frame into
//! a [`PacketBatch`](crate::models::PacketBatch) and reconnects with exponential
//! backoff when the connection drops. It never sends application messages.

pub mod client;
pub mod frame;

pub use client::{backoff_secs, ShutdownHandle, WsClient, WsClientConfig, WsConnectionState, WsError};
pub use frame::decode_frame;
