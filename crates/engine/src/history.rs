//! Bounded execution history
//!
//! The list is trimmed in bulk: once it is full, the oldest `trim` records
//! are evicted together before the next append. This keeps trims rare
//! instead of shifting the list on every append.

use parking_lot::Mutex;
use preheat_core::constants::{DEFAULT_HISTORY_MAX, DEFAULT_HISTORY_TRIM};
use preheat_core::HistoryRecord;

/// Appends execution records under a single lock
#[derive(Debug)]
pub struct HistoryRecorder {
    records: Mutex<Vec<HistoryRecord>>,
    max_records: usize,
    trim_count: usize,
}

impl HistoryRecorder {
    pub fn new(max_records: usize, trim_count: usize) -> Self {
        let max_records = max_records.max(1);
        Self {
            records: Mutex::new(Vec::new()),
            max_records,
            trim_count: trim_count.clamp(1, max_records),
        }
    }

    /// Append a record, bulk-evicting the oldest entries when full
    pub fn append(&self, record: HistoryRecord) {
        let mut records = self.records.lock();
        if records.len() >= self.max_records {
            let evicted = self.trim_count.min(records.len());
            records.drain(..evicted);
            tracing::debug!(evicted, remaining = records.len(), "trimmed preheat history");
        }
        records.push(record);
    }

    /// The last `n` records in insertion order
    pub fn recent(&self, n: usize) -> Vec<HistoryRecord> {
        let records = self.records.lock();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_MAX, DEFAULT_HISTORY_TRIM)
    }
}
