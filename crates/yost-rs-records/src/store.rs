//! Backing store interface shared by the writer and the query engine.

use crate::error::RecordError;
use async_trait::async_trait;
use serde_json::Value;

/// Raw attribute map as persisted by a store.
pub type RawItem = serde_json::Map<String, Value>;

/// Attribute names used in persisted items.
pub mod attr {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const CREATED_AT: &str = "createdAt";
    pub const HAS_VERIFIED_LINK: &str = "hasVerifiedLink";
}

/// Single attribute equality predicate a store may evaluate server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePredicate {
    /// Attribute name.
    pub attribute: String,
    /// Value the attribute must equal.
    pub value: Value,
}

impl AttributePredicate {
    pub fn equals(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Predicate selecting items with a verification link.
    pub fn has_verified_link() -> Self {
        Self::equals(attr::HAS_VERIFIED_LINK, true)
    }

    /// Whether the item carries the attribute with the expected value.
    /// An absent attribute never matches.
    pub fn matches(&self, item: &RawItem) -> bool {
        item.get(&self.attribute) == Some(&self.value)
    }
}

#[async_trait]
/// Key-value store partitioned by display name and sorted by creation time.
pub trait RecordStore: Send + Sync {
    /// Insert an item keyed by `(displayName, createdAt)`.
    ///
    /// Putting an existing identity replaces the stored item.
    async fn put(&self, item: RawItem) -> Result<(), RecordError>;

    /// Return every item in the partition, optionally pre-filtered.
    ///
    /// A partition with no items yields an empty vector.
    async fn query(
        &self,
        partition_key: &str,
        filter: Option<&AttributePredicate>,
    ) -> Result<Vec<RawItem>, RecordError>;
}

/// Extract the `(displayName, createdAt)` identity of a raw item.
pub fn item_identity(item: &RawItem) -> Result<(String, i64), RecordError> {
    let display_name = item
        .get(attr::DISPLAY_NAME)
        .and_then(Value::as_str)
        .ok_or_else(|| RecordError::Malformed(format!("item is missing {}", attr::DISPLAY_NAME)))?;
    let created_at = item
        .get(attr::CREATED_AT)
        .and_then(Value::as_i64)
        .ok_or_else(|| RecordError::Malformed(format!("item is missing {}", attr::CREATED_AT)))?;
    Ok((display_name.to_string(), created_at))
}
