//! Error types for blob operations.

use thiserror::Error;

/// Errors returned by blob stores.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Key is empty, absolute or escapes the bucket.
    #[error("invalid blob key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
