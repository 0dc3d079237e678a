//! # Upload Pipeline
//!
//! The single entry point for callers. [`UploadPipeline::upload`] takes a file
//! name and its raw bytes and always returns an [`UploadResult`]:
//!
//! ```text
//! received ──► validated ──► processed ──► persisted ──► completed
//!    │             │             │
//!    └─────────────┴─────────────┴──► rejected (failure result)
//! ```
//!
//! 1. Name must not be blank, content must be present and non-empty.
//! 2. Extension must be in the allow-set, size must be within the limit.
//! 3. Bytes are decoded and counted (see [`crate::processor`]).
//! 4. A [`Record`] is built, inserted into the store, and the whole store is
//!    handed to the [`SnapshotSink`].
//!
//! A rejected upload never touches the store or the sink.
//!
//! [`UploadPipeline::screen`] runs step 2 from a size alone, so a caller
//! reading from disk can refuse an oversized file before loading it.
//!
//! ## Concurrency
//!
//! `upload` takes `&self`. The store sits behind a mutex and the
//! insert-then-snapshot sequence runs inside one critical section, so every
//! snapshot handed to the sink contains every record inserted before it.
//! A panic inside the sink poisons the lock; later calls recover the guard
//! and carry on with the store as it stands.
//!
//! ## Generic Over SnapshotSink
//!
//! - Production: `UploadPipeline<JsonSnapshotFile>`
//! - Testing: `UploadPipeline<InMemorySink>`

use crate::config::UploadConfig;
use crate::error::Result;
use crate::model::Record;
use crate::outcome::{UploadError, UploadResult};
use crate::processor::{self, DecodeMode};
use crate::store::{RecordStore, SnapshotSink};
use crate::validator;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub struct UploadPipeline<S: SnapshotSink> {
    allowed_extensions: BTreeSet<String>,
    max_file_size_bytes: u64,
    decode_mode: DecodeMode,
    store: Mutex<RecordStore>,
    sink: S,
}

impl<S: SnapshotSink> UploadPipeline<S> {
    /// Pipeline with an empty store.
    pub fn new(config: UploadConfig, sink: S) -> Self {
        Self::with_records(config, sink, Vec::new())
    }

    /// Pipeline whose store starts with `records`, e.g. from an earlier run.
    ///
    /// Seeding does not write a snapshot. A repeated id keeps its first record.
    pub fn with_records<I>(config: UploadConfig, sink: S, records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut store = RecordStore::new();
        for record in records {
            if !store.insert(record) {
                warn!("Skipping duplicate record id while seeding store");
            }
        }

        let allowed_extensions = config.normalized_extensions();
        info!(
            allowed = ?allowed_extensions,
            max_file_size_bytes = config.max_file_size_bytes,
            decode_mode = ?config.decode_mode,
            seeded = store.len(),
            "Upload pipeline ready"
        );

        Self {
            allowed_extensions,
            max_file_size_bytes: config.max_file_size_bytes,
            decode_mode: config.decode_mode,
            store: Mutex::new(store),
            sink,
        }
    }

    /// Pipeline seeded with whatever the sink last persisted.
    pub fn open(config: UploadConfig, sink: S) -> Result<Self> {
        let records = sink.load_records()?;
        Ok(Self::with_records(config, sink, records))
    }

    pub fn upload(&self, file_name: &str, content: Option<&[u8]>) -> UploadResult {
        info!(file_name, "Upload started");

        match self.try_upload(file_name, content) {
            Ok(record) => {
                info!(
                    file_name,
                    id = %record.id(),
                    lines = record.line_count(),
                    words = record.word_count(),
                    "Upload completed"
                );
                UploadResult::success(record)
            }
            Err(err) => self.reject(file_name, err),
        }
    }

    /// Runs the name, type and size checks for `size` bytes of content
    /// without needing the content itself.
    ///
    /// Returns the failure result if the upload would be rejected, `None` if
    /// it may proceed to [`UploadPipeline::upload`].
    pub fn screen(&self, file_name: &str, size: u64) -> Option<UploadResult> {
        self.admit(file_name, size)
            .err()
            .map(|err| self.reject(file_name, err))
    }

    fn reject(&self, file_name: &str, err: UploadError) -> UploadResult {
        match &err {
            UploadError::Unexpected(_) => {
                error!(file_name, error = %err, "Upload failed unexpectedly")
            }
            _ => warn!(file_name, kind = %err.kind(), "Upload rejected: {}", err),
        }
        err.into()
    }

    fn admit(&self, file_name: &str, size: u64) -> std::result::Result<(), UploadError> {
        if file_name.trim().is_empty() {
            return Err(UploadError::EmptyFileName);
        }
        if size == 0 {
            return Err(UploadError::EmptyContent);
        }
        if !validator::is_allowed_type(file_name, &self.allowed_extensions) {
            return Err(UploadError::InvalidType {
                allowed: self.allowed_extensions(),
            });
        }
        if !validator::is_within_size_limit(size, self.max_file_size_bytes) {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_file_size_bytes,
            });
        }
        Ok(())
    }

    fn try_upload(
        &self,
        file_name: &str,
        content: Option<&[u8]>,
    ) -> std::result::Result<Record, UploadError> {
        let content = content.unwrap_or_default();
        let size = content.len() as u64;
        self.admit(file_name, size)?;

        let stats = processor::process(content, self.decode_mode)
            .map_err(|e| UploadError::ProcessingFailed(e.to_string()))?;
        debug!(
            file_name,
            lines = stats.line_count,
            words = stats.word_count,
            "Processed"
        );

        let record = Record::new(file_name, stats, size);
        self.persist(record.clone())?;
        Ok(record)
    }

    fn persist(&self, record: Record) -> std::result::Result<(), UploadError> {
        let mut store = self.lock_store();

        let id = record.id();
        if !store.insert(record) {
            return Err(UploadError::Unexpected(format!("record id {} already stored", id)));
        }
        debug!(%id, total = store.len(), "Saved to store");

        if let Err(e) = self.sink.write_snapshot(&store.snapshot()) {
            warn!(error = %e, "Failed to save snapshot; record kept in memory");
        }
        Ok(())
    }

    /// Poisoning is cleared, not propagated: the store only grows and
    /// `insert` never leaves it half-written.
    fn lock_store(&self) -> MutexGuard<'_, RecordStore> {
        self.store.lock().unwrap_or_else(|poisoned| {
            warn!("Record store lock was poisoned; recovering");
            self.store.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Stored records in snapshot order.
    pub fn records(&self) -> Vec<Record> {
        self.lock_store().records().into_iter().cloned().collect()
    }

    pub fn get(&self, id: &Uuid) -> Option<Record> {
        self.lock_store().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized allow-set, sorted.
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.allowed_extensions.iter().cloned().collect()
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.decode_mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
