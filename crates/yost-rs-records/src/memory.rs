//! In-process record store.

use crate::error::RecordError;
use crate::store::{AttributePredicate, RawItem, RecordStore, item_identity};
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Record store held in memory, ordered by `(displayName, createdAt)`.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    items: RwLock<BTreeMap<(String, i64), RawItem>>,
    unavailable: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of stored items across all partitions.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn check_available(&self) -> Result<(), RecordError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecordError::StoreUnavailable(
                "simulated store outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, item: RawItem) -> Result<(), RecordError> {
        self.check_available()?;
        let identity = item_identity(&item)?;
        debug!(
            "memory store put (display_name={}, created_at={})",
            identity.0, identity.1
        );
        self.items.write().insert(identity, item);
        Ok(())
    }

    async fn query(
        &self,
        partition_key: &str,
        filter: Option<&AttributePredicate>,
    ) -> Result<Vec<RawItem>, RecordError> {
        self.check_available()?;
        let start = (partition_key.to_string(), i64::MIN);
        let end = (partition_key.to_string(), i64::MAX);
        let items: Vec<RawItem> = self
            .items
            .read()
            .range(start..=end)
            .map(|(_, item)| item)
            .filter(|item| filter.is_none_or(|predicate| predicate.matches(item)))
            .cloned()
            .collect();
        debug!(
            "memory store query (partition={}, returned={})",
            partition_key,
            items.len()
        );
        Ok(items)
    }
}
