//! # Upload Outcomes
//!
//! Every call to [`crate::pipeline::UploadPipeline::upload`] returns an
//! [`UploadResult`]: either a success carrying the stored [`Record`], or a
//! failure carrying a [`FailureKind`] and a human-readable message.
//!
//! Expected failure modes are values, not errors. [`UploadError`] is the
//! internal rejection type the pipeline builds while it runs; it is folded
//! into a failure result at the pipeline boundary and never escapes to the
//! caller.

use crate::model::Record;
use std::fmt;
use thiserror::Error;

/// Message used for faults that are not one of the expected rejections.
/// The underlying detail is logged, never returned.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Upload failed";

/// Category of a failed upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    EmptyFileName,
    EmptyContent,
    InvalidType,
    TooLarge,
    ProcessingFailed,
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::EmptyFileName => "empty-file-name",
            FailureKind::EmptyContent => "empty-content",
            FailureKind::InvalidType => "invalid-type",
            FailureKind::TooLarge => "too-large",
            FailureKind::ProcessingFailed => "processing-failed",
            FailureKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

/// Reasons an upload is rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Filename cannot be empty")]
    EmptyFileName,

    #[error("File content cannot be empty")]
    EmptyContent,

    #[error("Invalid file type. Only [{}] allowed", join_extensions(.allowed))]
    InvalidType { allowed: Vec<String> },

    #[error("File too large (max {})", size_limit(.max))]
    TooLarge { size: u64, max: u64 },

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// Detail is kept for logging only; the failure message is generic.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

fn join_extensions(allowed: &[String]) -> String {
    allowed.join(", ")
}

const MEGABYTE: u64 = 1024 * 1024;

/// Whole MiB, or the exact byte count when the limit is below one MiB.
fn size_limit(bytes: &u64) -> String {
    if *bytes >= MEGABYTE {
        format!("{}MB", bytes / MEGABYTE)
    } else {
        format!("{} bytes", bytes)
    }
}

impl UploadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            UploadError::EmptyFileName => FailureKind::EmptyFileName,
            UploadError::EmptyContent => FailureKind::EmptyContent,
            UploadError::InvalidType { .. } => FailureKind::InvalidType,
            UploadError::TooLarge { .. } => FailureKind::TooLarge,
            UploadError::ProcessingFailed(_) => FailureKind::ProcessingFailed,
            UploadError::Unexpected(_) => FailureKind::Unexpected,
        }
    }

    /// The message shown to the caller.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Unexpected(_) => UNEXPECTED_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Success(Record),
    Failure { kind: FailureKind, message: String },
}

/// Tagged outcome of one upload.
///
/// Built only through [`UploadResult::success`] and
/// [`UploadResult::failure`], so a failure always has a non-blank message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    outcome: Outcome,
}

impl UploadResult {
    pub fn success(record: Record) -> Self {
        Self {
            outcome: Outcome::Success(record),
        }
    }

    /// # Panics
    ///
    /// Panics if `message` is empty or only whitespace.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        assert!(
            !message.trim().is_empty(),
            "Error message required for failure result"
        );
        Self {
            outcome: Outcome::Failure { kind, message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.outcome {
            Outcome::Success(record) => Some(record),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self.outcome {
            Outcome::Success(record) => Some(record),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { message, .. } => Some(message),
        }
    }
}

impl From<UploadError> for UploadResult {
    fn from(err: UploadError) -> Self {
        UploadResult::failure(err.kind(), err.user_message())
    }
}

impl fmt::Display for UploadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success(record) => write!(f, "Success: {}", record),
            Outcome::Failure { message, .. } => write!(f, "Failure: {}", message),
        }
    }
}
