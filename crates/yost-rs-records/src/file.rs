//! File-backed record store writing one JSONL file per partition.

use crate::error::RecordError;
use crate::store::{AttributePredicate, RawItem, RecordStore, item_identity};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Record store persisting each partition as a sorted JSONL file.
#[derive(Debug)]
pub struct FileRecordStore {
    /// Root directory holding partition files.
    root: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    /// Open a store under `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, RecordError> {
        let root = root.as_ref().to_path_buf();
        if root.is_dir() {
            info!("record store already exists (root={})", root.display());
        } else {
            std::fs::create_dir_all(&root)?;
            info!("created record store (root={})", root.display());
        }
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the partition JSONL file, named by the SHA-256 of the display
    /// name so every partition gets a fixed-length, filesystem-safe name.
    fn partition_path(&self, partition_key: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", partition_file_stem(partition_key)))
    }

    fn temp_path(&self, partition_key: &str) -> PathBuf {
        self.root
            .join(format!("{}.jsonl.tmp", partition_file_stem(partition_key)))
    }

    fn load_partition(&self, partition_key: &str) -> Result<Vec<RawItem>, RecordError> {
        let file = match OpenOptions::new()
            .read(true)
            .open(self.partition_path(partition_key))
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let reader = BufReader::new(file);
        let mut items = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let item: RawItem = serde_json::from_str(&line)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Rewrite a partition atomically.
    fn write_partition(&self, partition_key: &str, items: &[RawItem]) -> Result<(), RecordError> {
        let path = self.partition_path(partition_key);
        let temp_path = self.temp_path(partition_key);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for item in items {
                let line = serde_json::to_string(item)?;
                writeln!(file, "{line}")?;
            }
            file.sync_all()?;
        }
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

fn partition_file_stem(partition_key: &str) -> String {
    hex::encode(Sha256::digest(partition_key.as_bytes()))
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn put(&self, item: RawItem) -> Result<(), RecordError> {
        let (display_name, created_at) = item_identity(&item)?;
        let _guard = self.write_lock.lock();
        let mut items = self.load_partition(&display_name)?;
        let mut position = Ok(items.len());
        for (idx, existing) in items.iter().enumerate() {
            let (_, existing_at) = item_identity(existing)?;
            if existing_at == created_at {
                position = Err(idx);
                break;
            }
            if existing_at > created_at {
                position = Ok(idx);
                break;
            }
        }
        match position {
            Ok(idx) => items.insert(idx, item),
            Err(idx) => items[idx] = item,
        }
        self.write_partition(&display_name, &items)?;
        debug!(
            "file store put (display_name={}, created_at={}, partition_len={})",
            display_name,
            created_at,
            items.len()
        );
        Ok(())
    }

    async fn query(
        &self,
        partition_key: &str,
        filter: Option<&AttributePredicate>,
    ) -> Result<Vec<RawItem>, RecordError> {
        let mut items = self.load_partition(partition_key)?;
        if let Some(predicate) = filter {
            items.retain(|item| predicate.matches(item));
        }
        debug!(
            "file store query (partition={}, returned={})",
            partition_key,
            items.len()
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::{FileRecordStore, partition_file_stem};
    use crate::error::RecordError;
    use crate::store::{AttributePredicate, RawItem, RecordStore};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    fn item(value: Value) -> RawItem {
        match value {
            Value::Object(map) => map,
            _ => panic!("object"),
        }
    }

    #[tokio::test]
    async fn new_creates_missing_root() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("nested").join("records");
        let store = FileRecordStore::new(&root).expect("store");
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[tokio::test]
    async fn items_survive_reopen_in_creation_order() {
        let temp = tempdir().expect("tempdir");
        {
            let store = FileRecordStore::new(temp.path()).expect("store");
            for created_at in [30, 10, 20] {
                store
                    .put(item(json!({ "displayName": "u/1", "createdAt": created_at })))
                    .await
                    .expect("put");
            }
        }
        let store = FileRecordStore::new(temp.path()).expect("reopen");
        let items = store.query("u/1", None).await.expect("query");
        let created: Vec<i64> = items
            .iter()
            .map(|item| item["createdAt"].as_i64().expect("created"))
            .collect();
        assert_eq!(created, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn put_with_same_identity_replaces() {
        let temp = tempdir().expect("tempdir");
        let store = FileRecordStore::new(temp.path()).expect("store");
        store
            .put(item(json!({ "displayName": "u1", "createdAt": 5, "blobKey": "a" })))
            .await
            .expect("put");
        store
            .put(item(json!({ "displayName": "u1", "createdAt": 5, "blobKey": "b" })))
            .await
            .expect("put");
        let items = store.query("u1", None).await.expect("query");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["blobKey"], json!("b"));
    }

    #[tokio::test]
    async fn partitions_are_isolated_and_filtered() {
        let temp = tempdir().expect("tempdir");
        let store = FileRecordStore::new(temp.path()).expect("store");
        store
            .put(item(json!({ "displayName": "u1", "createdAt": 1, "hasVerifiedLink": true })))
            .await
            .expect("put");
        store
            .put(item(json!({ "displayName": "u1", "createdAt": 2 })))
            .await
            .expect("put");
        store
            .put(item(json!({ "displayName": "u2", "createdAt": 1, "hasVerifiedLink": true })))
            .await
            .expect("put");

        let items = store
            .query("u1", Some(&AttributePredicate::has_verified_link()))
            .await
            .expect("query");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["displayName"], json!("u1"));
        assert!(store.query("u3", None).await.expect("query").is_empty());
    }

    #[tokio::test]
    async fn corrupt_partition_is_malformed() {
        let temp = tempdir().expect("tempdir");
        let store = FileRecordStore::new(temp.path()).expect("store");
        std::fs::write(
            temp.path().join(format!("{}.jsonl", partition_file_stem("u1"))),
            "not json\n",
        )
        .expect("write");
        let err = store.query("u1", None).await.unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }

    #[tokio::test]
    async fn long_display_names_get_fixed_length_files() {
        let temp = tempdir().expect("tempdir");
        let store = FileRecordStore::new(temp.path()).expect("store");
        let long_name = "n".repeat(300);
        store
            .put(item(json!({ "displayName": long_name.as_str(), "createdAt": 1 })))
            .await
            .expect("put");
        let items = store.query(&long_name, None).await.expect("query");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["displayName"], json!(long_name.as_str()));
        assert_eq!(partition_file_stem(&long_name).len(), 64);
        assert!(store.query(&"n".repeat(299), None).await.expect("query").is_empty());
    }

    #[tokio::test]
    async fn put_rejects_items_without_identity() {
        let temp = tempdir().expect("tempdir");
        let store = FileRecordStore::new(temp.path()).expect("store");
        let err = store
            .put(item(json!({ "displayName": "u1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }
}
