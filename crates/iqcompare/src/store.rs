//! Append-only record store.

use crate::record::MetricRecord;

/// Accumulated records across every upload, in append order.
///
/// The store is the single point of mutation; everything downstream is
/// recomputed from [`RecordStore::records`].
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<MetricRecord>,
    batches: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the store with one batch. Previously held records keep their
    /// positions. Returns the number of records added.
    pub fn append(&mut self, records: Vec<MetricRecord>) -> usize {
        let n = records.len();
        if n > 0 {
            self.records.extend(records);
            self.batches += 1;
        }
        n
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.batches = 0;
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of non-empty appends since the last clear.
    pub fn batch_count(&self) -> usize {
        self.batches
    }
}
