//! Error types for record operations.

use thiserror::Error;

/// Which direction of the verified-link rule a write request broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkViolation {
    /// `has_verified_link` is set but no link was supplied.
    #[error("verification link must be provided when has_verified_link is true")]
    MissingLink,
    /// A link was supplied without setting `has_verified_link`.
    #[error("has_verified_link must be true when a verification link is provided")]
    LinkWithoutFlag,
}

/// Errors returned by the record writer, query engine and stores.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The request's verification attributes contradict each other.
    #[error("invalid attribute combination: {0}")]
    InvalidAttributeCombination(LinkViolation),
    /// The backing store failed to serve the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// A stored item could not be decoded into a record.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
