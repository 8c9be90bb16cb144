use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use yost_rs_records::{AttributePredicate, RawItem, RecordError, RecordStore};

/// Build a raw item from a JSON object literal.
pub fn raw_item(value: Value) -> RawItem {
    match value {
        Value::Object(map) => map,
        other => panic!("raw items must be objects, got {other}"),
    }
}

/// Store double that records every call and serves canned items.
///
/// Queries return the canned items verbatim, ignoring both the partition key
/// and any predicate.
#[derive(Default)]
pub struct RecordingStore {
    items: Vec<RawItem>,
    failure: Option<String>,
    puts: Mutex<Vec<RawItem>>,
    queries: Mutex<Vec<(String, Option<AttributePredicate>)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<RawItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Fail every call with `StoreUnavailable(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn puts(&self) -> Vec<RawItem> {
        self.puts.lock().clone()
    }

    pub fn queries(&self) -> Vec<(String, Option<AttributePredicate>)> {
        self.queries.lock().clone()
    }

    fn check(&self) -> Result<(), RecordError> {
        match &self.failure {
            Some(message) => Err(RecordError::StoreUnavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn put(&self, item: RawItem) -> Result<(), RecordError> {
        self.puts.lock().push(item);
        self.check()
    }

    async fn query(
        &self,
        partition_key: &str,
        filter: Option<&AttributePredicate>,
    ) -> Result<Vec<RawItem>, RecordError> {
        self.queries
            .lock()
            .push((partition_key.to_string(), filter.cloned()));
        self.check()?;
        Ok(self.items.clone())
    }
}
