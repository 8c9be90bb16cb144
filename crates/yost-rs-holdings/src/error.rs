//! Error types for holdings retrieval.

use thiserror::Error;

/// Errors returned by holdings providers.
#[derive(Debug, Error)]
pub enum HoldingsError {
    /// The upstream provider rejected or failed the call.
    #[error("provider error: {0}")]
    Provider(String),
    /// A holding carried neither an ISO nor an unofficial currency code.
    #[error("holding for security {security_id} has no currency code")]
    MissingCurrency { security_id: String },
}
