//! Config errors.

use thiserror::Error;

/// Failure while reading, merging or checking `yost.json5` layers.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config layer: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("config is not valid JSON5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged value passed the schema but not the typed model.
    #[error("config does not match the model: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// `path` is `<layer>:<dotted.key>`.
    #[error("config rejected at {path}: {message}")]
    InvalidField { path: String, message: String },
    #[error("config rejected: {0}")]
    Invalid(String),
    /// No explicit storage path and no home directory to default under.
    #[error("cannot resolve default {0} path: home directory unavailable")]
    NoDefaultPath(&'static str),
}
