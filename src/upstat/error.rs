use thiserror::Error;

/// Infrastructure errors: config, snapshot file, logging.
///
/// Rejected uploads are not errors at this level; they travel inside
/// [`crate::outcome::UploadResult`].
#[derive(Error, Debug)]
pub enum UpstatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, UpstatError>;
