//! # Storage Layer
//!
//! Two pieces live here:
//!
//! - [`RecordStore`]: the in-memory map from record id to [`Record`]. It is the
//!   source of truth for a running process. It only grows: there is no update
//!   and no removal.
//! - [`SnapshotSink`]: where the store is mirrored after every accepted upload.
//!
//! ## Implementations
//!
//! - [`fs::JsonSnapshotFile`]: Production sink
//!   - Whole store written to `local.json` on every call
//!   - Write to a temp file, then rename
//!
//! - [`memory::InMemorySink`]: Sink for tests and the demo
//!   - Keeps every snapshot it receives
//!   - Can be told to fail, to exercise the non-fatal persistence path
//!
//! ## Snapshot Format
//!
//! ```text
//! {
//!   "records": [
//!     { "id": "...", "fileName": "test.txt", "lineCount": 2, "wordCount": 4,
//!       "fileSize": 23, "processedAt": "2026-01-01T12:00:00Z" }
//!   ],
//!   "totalRecords": 1,
//!   "lastUpdated": "2026-01-01T12:00:00Z"
//! }
//! ```
//!
//! Records are ordered by `processedAt`, then `id`. The order carries no
//! meaning; it only keeps the file stable between writes.

use crate::error::Result;
use crate::model::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Process-lifetime map of accepted uploads.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: HashMap<Uuid, Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Returns false, leaving the store unchanged, if the id
    /// is already present.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.records.contains_key(&record.id()) {
            return false;
        }
        self.records.insert(record.id(), record);
        true
    }

    pub fn get(&self, id: &Uuid) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in snapshot order.
    pub fn records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.processed_at()
                .cmp(&b.processed_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        records
    }

    pub fn snapshot(&self) -> Snapshot {
        let records: Vec<Record> = self.records().into_iter().cloned().collect();
        Snapshot {
            total_records: records.len(),
            records,
            last_updated: Utc::now(),
        }
    }
}

/// Serialized form of the whole store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub records: Vec<Record>,
    pub total_records: usize,
    pub last_updated: DateTime<Utc>,
}

/// Destination for store snapshots.
///
/// Called with the complete store after every accepted upload. An error here
/// is reported by the caller but never undoes the upload.
pub trait SnapshotSink {
    /// Persist the given snapshot, replacing any previous one
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    /// Records from the most recent persisted snapshot, empty if there is none
    fn load_records(&self) -> Result<Vec<Record>>;
}
