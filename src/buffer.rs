//! # Fusion Buffer
//!
//! In-memory ordered collection of fused records awaiting persistence.
//!
//! The buffer is owned exclusively by the acquisition loop. Records leave it
//! only through `drain_all`, which snapshots and clears in one logical
//! operation; a concurrent reimplementation must keep that atomicity (e.g.
//! a mutex-guarded swap) so no record is lost or duplicated.

use crate::record::FusedRecord;

/// Ordered sequence of fused records pending a flush
#[derive(Debug, Default)]
pub struct FusionBuffer {
    records: Vec<FusedRecord>,
}

impl FusionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, preserving insertion order
    pub fn append(&mut self, record: FusedRecord) {
        self.records.push(record);
    }

    /// Take the current contents and empty the buffer in one operation
    pub fn drain_all(&mut self) -> Vec<FusedRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
