//! Append-only packet store.
//!
//! Records and their raw payloads are held in two parallel corpora that are
//! always the same length: slot `i` of one belongs to slot `i` of the other.
//! Nothing is ever evicted; display code reads a window off the tail instead.

use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, warn};

use crate::error::LookupError;
use crate::models::{PacketBatch, Record};

/// Number of trailing records the view renders.
pub const DISPLAY_WINDOW: usize = 1000;

/// Growing record corpus with a parallel raw-payload corpus.
#[derive(Debug, Default)]
pub struct StreamStore {
    records: Vec<Record>,
    payloads: Vec<Vec<u8>>,
    /// Record id -> slot, first occurrence wins
    slots: HashMap<u64, usize>,
}

impl StreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch in arrival order.
    ///
    /// Both corpora grow together inside this call, so no reader can observe
    /// one longer than the other. Returns the slot range that was appended.
    pub fn ingest(&mut self, batch: PacketBatch) -> Range<usize> {
        let start = self.records.len();
        self.records.reserve(batch.len());
        self.payloads.reserve(batch.len());

        for raw in batch {
            let (record, payload) = raw.into_parts();
            let slot = self.records.len();
            if let Some(existing) = self.slots.get(&record.id) {
                warn!(
                    "Duplicate packet id {} at slot {} (first seen at slot {})",
                    record.id, slot, existing
                );
            } else {
                self.slots.insert(record.id, slot);
            }
            self.records.push(record);
            self.payloads.push(payload);
        }

        let end = self.records.len();
        debug!("Ingested {} packets, corpus now {}", end - start, end);
        start..end
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_at(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn raw_at(&self, index: usize) -> Option<&[u8]> {
        self.payloads.get(index).map(Vec::as_slice)
    }

    /// The full record corpus.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records in `range`, clamped to the corpus.
    pub fn slice(&self, range: Range<usize>) -> &[Record] {
        let end = range.end.min(self.records.len());
        let start = range.start.min(end);
        &self.records[start..end]
    }

    /// Id of the first record ever ingested.
    pub fn first_id(&self) -> Option<u64> {
        self.records.first().map(|r| r.id)
    }

    /// Slot holding the record with `id`.
    ///
    /// With dense increasing ids this is `id - first_id`; gaps and out-of-order
    /// arrival resolve too because slots are recorded at ingest time.
    pub fn resolve_by_id(&self, id: u64) -> Result<usize, LookupError> {
        self.slots
            .get(&id)
            .copied()
            .filter(|&slot| slot < self.records.len())
            .ok_or(LookupError::NotFound { id })
    }

    /// The last `size` records.
    pub fn window(&self, size: usize) -> &[Record] {
        let start = self.records.len().saturating_sub(size);
        &self.records[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;

    fn batch(ids: &[u64]) -> PacketBatch {
        ids.iter()
            .map(|&id| RawRecord::new(Record::new(id), vec![id as u8; (id % 5) as usize]))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = StreamStore::new();
        assert!(store.is_empty());
        assert_eq!(store.first_id(), None);
        assert!(store.window(DISPLAY_WINDOW).is_empty());
    }

    #[test]
    fn test_ingest_keeps_corpora_in_lockstep() {
        let mut store = StreamStore::new();
        assert_eq!(store.ingest(batch(&[1, 2, 3])), 0..3);
        assert_eq!(store.ingest(batch(&[4, 5])), 3..5);
        assert_eq!(store.len(), 5);

        for i in 0..store.len() {
            let record = store.record_at(i).unwrap();
            let raw = store.raw_at(i).unwrap();
            assert_eq!(raw, vec![record.id as u8; (record.id % 5) as usize].as_slice());
        }
        assert!(store.record_at(5).is_none());
        assert!(store.raw_at(5).is_none());
    }

    #[test]
    fn test_empty_batch() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[1]));
        assert_eq!(store.ingest(Vec::new()), 1..1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_dense_ids_matches_offset() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[100, 101, 102, 103]));
        let first = store.first_id().unwrap();
        for id in 100..104 {
            assert_eq!(store.resolve_by_id(id).unwrap(), (id - first) as usize);
        }
    }

    #[test]
    fn test_resolve_unknown_id() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[10, 11]));
        assert_eq!(store.resolve_by_id(9), Err(LookupError::NotFound { id: 9 }));
        assert_eq!(store.resolve_by_id(12), Err(LookupError::NotFound { id: 12 }));
        assert_eq!(StreamStore::new().resolve_by_id(0), Err(LookupError::NotFound { id: 0 }));
    }

    #[test]
    fn test_resolve_with_gaps_and_reordering() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[5, 9, 7]));
        assert_eq!(store.resolve_by_id(5), Ok(0));
        assert_eq!(store.resolve_by_id(9), Ok(1));
        assert_eq!(store.resolve_by_id(7), Ok(2));
        assert!(store.resolve_by_id(6).is_err());
    }

    #[test]
    fn test_duplicate_id_keeps_first_slot() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[1, 2]));
        store.ingest(batch(&[2, 3]));
        assert_eq!(store.len(), 4);
        assert_eq!(store.resolve_by_id(2), Ok(1));
        assert_eq!(store.resolve_by_id(3), Ok(3));
    }

    #[test]
    fn test_window_is_tail_slice() {
        let mut store = StreamStore::new();
        let ids: Vec<u64> = (1..=1500).collect();
        store.ingest(batch(&ids));

        let window = store.window(DISPLAY_WINDOW);
        assert_eq!(window.len(), DISPLAY_WINDOW);
        assert_eq!(window.first().unwrap().id, 501);
        assert_eq!(window.last().unwrap().id, 1500);
        assert_eq!(store.len(), 1500);
        assert_eq!(store.window(10_000).len(), 1500);
    }

    #[test]
    fn test_slice_clamps() {
        let mut store = StreamStore::new();
        store.ingest(batch(&[1, 2, 3]));
        assert_eq!(store.slice(1..3).len(), 2);
        assert_eq!(store.slice(2..10).len(), 1);
        assert!(store.slice(5..9).is_empty());
    }
}
