//! In-memory blob store.

use crate::error::BlobError;
use crate::store::{BlobReceipt, BlobStore, content_etag, validate_key};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Blob store holding objects in a map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<BlobReceipt, BlobError> {
        validate_key(key)?;
        self.objects.write().insert(key.to_string(), bytes.to_vec());
        Ok(BlobReceipt {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            location: format!("memory://{}/{}", self.bucket, key),
            etag: content_etag(bytes),
            size: bytes.len() as u64,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        validate_key(key)?;
        Ok(self.objects.read().get(key).cloned())
    }
}
