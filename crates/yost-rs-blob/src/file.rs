//! Filesystem blob store laid out as `<root>/<bucket>/<key>`.

use crate::error::BlobError;
use crate::store::{BlobReceipt, BlobStore, content_etag, validate_key};
use async_trait::async_trait;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Blob store writing each object to its own file.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    bucket: String,
    bucket_dir: PathBuf,
}

impl FileBlobStore {
    /// Open the bucket under `root`, creating its directory if needed.
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>) -> Result<Self, BlobError> {
        let bucket = bucket.into();
        validate_key(&bucket)?;
        let bucket_dir = root.as_ref().join(&bucket);
        fs::create_dir_all(&bucket_dir)?;
        info!("initialized file blob store (bucket_dir={})", bucket_dir.display());
        Ok(Self { bucket, bucket_dir })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, BlobError> {
        validate_key(key)?;
        Ok(self.bucket_dir.join(key))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<BlobReceipt, BlobError> {
        let path = self.object_path(key)?;
        let parent = path.parent().unwrap_or(self.bucket_dir.as_path());
        fs::create_dir_all(parent)?;
        // Random staging name; only `key` itself is ever replaced.
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|err| err.error)?;
        debug!(
            "stored blob (bucket={}, key={}, size={})",
            self.bucket,
            key,
            bytes.len()
        );
        Ok(BlobReceipt {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            location: format!("file://{}", path.display()),
            etag: content_etag(bytes),
            size: bytes.len() as u64,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.object_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("blob not found (bucket={}, key={})", self.bucket, key);
                Ok(None)
            }
            Err(err) => Err(BlobError::Io(err)),
        }
    }
}
