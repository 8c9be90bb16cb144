//! Blob store interface.

use crate::error::BlobError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Acknowledgement returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobReceipt {
    pub bucket: String,
    pub key: String,
    /// Where the object can be retrieved from.
    pub location: String,
    /// Quoted SHA-256 hex digest of the content.
    pub etag: String,
    pub size: u64,
}

#[async_trait]
/// Object storage keyed by relative, slash-separated keys.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<BlobReceipt, BlobError>;

    /// Fetch the object under `key`; `Ok(None)` when it does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
}

/// Reject keys that are empty, absolute, or contain `.`/`..`/empty segments.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    let invalid = |reason| {
        Err(BlobError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };
    if key.is_empty() {
        return invalid("key is empty");
    }
    if key.contains('\\') {
        return invalid("backslashes are not allowed");
    }
    if key.starts_with('/') {
        return invalid("key must be relative");
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return invalid("key has an empty or relative segment");
    }
    Ok(())
}

/// Entity tag for blob content.
pub fn content_etag(bytes: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(bytes)))
}
