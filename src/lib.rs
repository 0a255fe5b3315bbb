//! Sniffer - a terminal viewer for a live stream of captured packets
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod dump;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod logging;
pub mod models;
pub mod startup;
pub mod store;
pub mod terminal;
pub mod traits;
pub mod ui;
pub mod view;
pub mod websocket;
