//! Decoding of feed frames into packet batches.

use serde::Deserialize;

use crate::models::{PacketBatch, RawRecord};

/// Accepted frame shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Frame {
    Batch(Vec<RawRecord>),
    Single(Box<RawRecord>),
}

/// Decode one frame into a batch.
///
/// A JSON array of records is one batch. A bare record object is a batch of
/// one, which is what the upstream sniffer sends per captured packet.
pub fn decode_frame(text: &str) -> Result<PacketBatch, serde_json::Error> {
    match serde_json::from_str::<Frame>(text) {
        Ok(Frame::Batch(batch)) => Ok(batch),
        Ok(Frame::Single(record)) => Ok(vec![*record]),
        // Untagged errors are vague; re-parse as a batch for a useful message
        Err(_) => serde_json::from_str::<PacketBatch>(text),
    }
}
