use super::{Snapshot, SnapshotSink};
use crate::error::{Result, UpstatError};
use crate::model::Record;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory sink for tests and the demo.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemorySink {
    snapshots: Mutex<Vec<Snapshot>>,
    fail_writes: AtomicBool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes always fail.
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.set_fail_writes(true);
        sink
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of snapshots written so far.
    pub fn write_count(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.snapshots
            .lock()
            .ok()
            .and_then(|s| s.last().cloned())
    }
}

impl SnapshotSink for InMemorySink {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(UpstatError::Store("snapshot write disabled".to_string()));
        }
        self.snapshots
            .lock()
            .map_err(|_| UpstatError::Store("snapshot list poisoned".to_string()))?
            .push(snapshot.clone());
        Ok(())
    }

    fn load_records(&self) -> Result<Vec<Record>> {
        Ok(self
            .last_snapshot()
            .map(|snapshot| snapshot.records)
            .unwrap_or_default())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::TextStats;
    use crate::store::RecordStore;

    pub struct SinkFixture {
        pub sink: InMemorySink,
    }

    impl Default for SinkFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SinkFixture {
        pub fn new() -> Self {
            Self {
                sink: InMemorySink::new(),
            }
        }

        /// Pre-load the sink with a snapshot holding `count` records.
        pub fn with_records(self, count: usize) -> Self {
            let mut store = RecordStore::new();
            for i in 0..count {
                let stats = TextStats {
                    line_count: 1,
                    word_count: (i + 1) as u64,
                };
                store.insert(Record::new(format!("file-{}.txt", i + 1), stats, 8));
            }
            self.sink.write_snapshot(&store.snapshot()).unwrap();
            self
        }

        pub fn failing(self) -> Self {
            self.sink.set_fail_writes(true);
            self
        }
    }
}
