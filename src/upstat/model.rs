use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Line and word counts extracted from one upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub line_count: u64,
    pub word_count: u64,
}

/// Statistics recorded for one accepted upload.
///
/// Fields are private and there are no setters: once built, a record never
/// changes. The id and timestamp are assigned by [`Record::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: Uuid,
    file_name: String,
    line_count: u64,
    word_count: u64,
    #[serde(rename = "fileSize")]
    byte_size: u64,
    processed_at: DateTime<Utc>,
}

impl Record {
    pub fn new(file_name: impl Into<String>, stats: TextStats, byte_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            line_count: stats.line_count,
            word_count: stats.word_count,
            byte_size,
            processed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File: {}, Lines: {}, Words: {}",
            self.file_name, self.line_count, self.word_count
        )
    }
}
