use super::{Snapshot, SnapshotSink};
use crate::error::{Result, UpstatError};
use crate::model::Record;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SNAPSHOT_FILENAME: &str = "local.json";

/// Mirrors the store to a single JSON file.
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    /// Snapshot file named `local.json` inside `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::at(dir.as_ref().join(SNAPSHOT_FILENAME))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(UpstatError::Io)?;
            }
        }
        Ok(())
    }

    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(UpstatError::Io)?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(UpstatError::Serialization)?;
        Ok(Some(snapshot))
    }
}

impl SnapshotSink for JsonSnapshotFile {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_parent()?;

        let content = serde_json::to_string_pretty(snapshot).map_err(UpstatError::Serialization)?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| UpstatError::Store(format!("Not a file path: {}", self.path.display())))?;
        let tmp_file = self.path.with_file_name(format!(
            ".{}-{}.tmp",
            file_name.to_string_lossy(),
            Uuid::new_v4()
        ));
        fs::write(&tmp_file, content).map_err(UpstatError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(UpstatError::Io(e));
        }

        Ok(())
    }

    fn load_records(&self) -> Result<Vec<Record>> {
        Ok(self
            .load_snapshot()?
            .map(|snapshot| snapshot.records)
            .unwrap_or_default())
    }
}
