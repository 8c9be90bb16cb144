//! Record model and request types.

use crate::error::RecordError;
use crate::store::RawItem;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Minimum delay between a record's creation and its first visibility.
pub const COOLDOWN_WINDOW_SECS: i64 = 10 * 60;

/// Persisted record, identified by `(display_name, created_at)`.
///
/// The serialized form is sparse: `false` flags and empty links are omitted,
/// and every absent attribute decodes to its zero value. The optional
/// attributes are also read leniently: a value of the wrong type decodes as
/// if it were absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    /// Partition key shared by every record of one owner.
    pub display_name: String,
    /// Opaque reference to externally stored content.
    pub blob_key: String,
    /// Creation time in unix seconds.
    pub created_at: i64,
    /// Earliest unix second at which queries may return the record.
    pub visible_after: i64,
    /// Whether a verification link is attached.
    #[serde(skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub has_verified_link: bool,
    /// Whether the record's owner is verified.
    #[serde(skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub is_verified_user: bool,
    /// External verification link, present only with `has_verified_link`.
    #[serde(skip_serializing_if = "is_blank", deserialize_with = "lenient_link")]
    pub verification_link: Option<String>,
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

/// Only a non-empty string counts as a link.
fn lenient_link<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(link) if !link.is_empty() => Some(link),
        _ => None,
    })
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl Record {
    /// Whether the cooldown has elapsed at `now`. The boundary second is visible.
    pub fn is_visible_at(&self, now: i64) -> bool {
        self.visible_after <= now
    }

    /// Encode into the sparse attribute map handed to a store.
    pub fn to_item(&self) -> Result<RawItem, RecordError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(RecordError::Malformed(format!(
                "record encoded as non-object: {other}"
            ))),
        }
    }

    /// Decode a raw store item, substituting zero values for absent attributes.
    pub fn from_item(item: RawItem) -> Result<Self, RecordError> {
        Ok(serde_json::from_value(Value::Object(item))?)
    }
}

/// Input accepted by [`crate::RecordWriter::save`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub display_name: String,
    pub blob_key: String,
    #[serde(default)]
    pub has_verified_link: Option<bool>,
    /// Requested visibility boundary; raised to the cooldown floor if earlier.
    #[serde(default)]
    pub visible_after: Option<i64>,
    #[serde(default)]
    pub is_verified_user: Option<bool>,
    #[serde(default)]
    pub verification_link: Option<String>,
}

impl WriteRequest {
    /// Request for a plain record with no verification attributes.
    pub fn new(display_name: impl Into<String>, blob_key: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            blob_key: blob_key.into(),
            ..Self::default()
        }
    }

    /// Attach a verification link and set `has_verified_link`.
    pub fn with_verified_link(mut self, link: impl Into<String>) -> Self {
        self.has_verified_link = Some(true);
        self.verification_link = Some(link.into());
        self
    }

    /// Set `has_verified_link` without touching the link.
    pub fn with_has_verified_link(mut self, has_verified_link: bool) -> Self {
        self.has_verified_link = Some(has_verified_link);
        self
    }

    /// Set the link without touching `has_verified_link`.
    pub fn with_verification_link(mut self, link: impl Into<String>) -> Self {
        self.verification_link = Some(link.into());
        self
    }

    /// Request a visibility time in unix seconds.
    pub fn with_visible_after(mut self, visible_after: i64) -> Self {
        self.visible_after = Some(visible_after);
        self
    }

    /// Mark whether the record's owner is verified.
    pub fn with_verified_user(mut self, is_verified_user: bool) -> Self {
        self.is_verified_user = Some(is_verified_user);
        self
    }

    /// The link, treating an empty string as absent.
    pub(crate) fn link(&self) -> Option<&str> {
        self.verification_link
            .as_deref()
            .filter(|link| !link.is_empty())
    }
}

/// Input accepted by [`crate::RecordQueryEngine::query`].
///
/// Filters are only applied when requested as `Some(true)`; `None` and
/// `Some(false)` both leave the attribute unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub display_name: String,
    #[serde(default)]
    pub has_verified_link: Option<bool>,
    #[serde(default)]
    pub is_verified_user: Option<bool>,
}

impl QueryRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Only return records carrying a verification link.
    pub fn verified_links_only(mut self) -> Self {
        self.has_verified_link = Some(true);
        self
    }

    /// Only return records whose owner is verified.
    pub fn verified_users_only(mut self) -> Self {
        self.is_verified_user = Some(true);
        self
    }

    pub(crate) fn wants_verified_link(&self) -> bool {
        self.has_verified_link == Some(true)
    }

    pub(crate) fn wants_verified_user(&self) -> bool {
        self.is_verified_user == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, WriteRequest};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plain_record() -> Record {
        Record {
            display_name: "u1".to_string(),
            blob_key: "k1".to_string(),
            created_at: 1000,
            visible_after: 1600,
            ..Record::default()
        }
    }

    #[test]
    fn sparse_encoding_omits_zero_values() {
        let item = plain_record().to_item().expect("encode");
        assert_eq!(
            serde_json::Value::Object(item),
            json!({
                "displayName": "u1",
                "blobKey": "k1",
                "createdAt": 1000,
                "visibleAfter": 1600
            })
        );
    }

    #[test]
    fn encoding_keeps_set_flags_and_link() {
        let record = Record {
            has_verified_link: true,
            is_verified_user: true,
            verification_link: Some("https://x.example/u1".to_string()),
            ..plain_record()
        };
        let item = record.to_item().expect("encode");
        assert_eq!(item["hasVerifiedLink"], json!(true));
        assert_eq!(item["isVerifiedUser"], json!(true));
        assert_eq!(item["verificationLink"], json!("https://x.example/u1"));
    }

    #[test]
    fn empty_link_is_not_written() {
        let record = Record {
            verification_link: Some(String::new()),
            ..plain_record()
        };
        let item = record.to_item().expect("encode");
        assert!(!item.contains_key("verificationLink"));
    }

    #[test]
    fn decoding_substitutes_defaults_for_missing_attributes() {
        let item = json!({ "displayName": "u1", "visibleAfter": 5 });
        let serde_json::Value::Object(item) = item else {
            panic!("object");
        };
        let record = Record::from_item(item).expect("decode");
        assert_eq!(
            record,
            Record {
                display_name: "u1".to_string(),
                visible_after: 5,
                ..Record::default()
            }
        );
    }

    #[test]
    fn decoding_treats_empty_link_as_absent() {
        let serde_json::Value::Object(item) =
            json!({ "displayName": "u1", "verificationLink": "" })
        else {
            panic!("object");
        };
        let record = Record::from_item(item).expect("decode");
        assert_eq!(record.verification_link, None);
    }

    #[test]
    fn decoding_rejects_wrongly_typed_required_attributes() {
        for item in [
            json!({ "displayName": "u1", "visibleAfter": "soon" }),
            json!({ "displayName": "u1", "createdAt": "now" }),
            json!({ "displayName": 7 }),
            json!({ "displayName": "u1", "blobKey": false }),
        ] {
            let serde_json::Value::Object(item) = item else {
                panic!("object");
            };
            assert!(Record::from_item(item).is_err());
        }
    }

    #[test]
    fn decoding_zeroes_wrongly_typed_optional_attributes() {
        let serde_json::Value::Object(item) = json!({
            "displayName": "u1",
            "visibleAfter": 5,
            "hasVerifiedLink": "true",
            "isVerifiedUser": "yes",
            "verificationLink": 42
        }) else {
            panic!("object");
        };
        let record = Record::from_item(item).expect("decode");
        assert!(!record.has_verified_link);
        assert!(!record.is_verified_user);
        assert_eq!(record.verification_link, None);
        assert_eq!(record.visible_after, 5);
    }

    #[test]
    fn decoding_keeps_well_typed_optional_attributes() {
        let serde_json::Value::Object(item) = json!({
            "displayName": "u1",
            "hasVerifiedLink": true,
            "isVerifiedUser": true,
            "verificationLink": "L"
        }) else {
            panic!("object");
        };
        let record = Record::from_item(item).expect("decode");
        assert!(record.has_verified_link);
        assert!(record.is_verified_user);
        assert_eq!(record.verification_link.as_deref(), Some("L"));
    }

    #[test]
    fn visibility_boundary_is_inclusive() {
        let record = plain_record();
        assert!(!record.is_visible_at(1599));
        assert!(record.is_visible_at(1600));
        assert!(record.is_visible_at(1601));
    }

    #[test]
    fn request_link_ignores_empty_string() {
        let request = WriteRequest::new("u1", "k1").with_verification_link("");
        assert_eq!(request.link(), None);
    }
}
