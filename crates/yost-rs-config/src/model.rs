//! Configuration schema for Yost.

use crate::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory under the home directory holding default data.
const DEFAULT_DATA_DIR: &str = ".yost";

/// Root config for Yost storage and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct YostConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub blobs: BlobsConfig,
    #[serde(default)]
    pub holdings: HoldingsConfig,
}

impl YostConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> YostConfigBuilder {
        YostConfigBuilder::new()
    }
}

/// Builder for assembling a `YostConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct YostConfigBuilder {
    config: YostConfig,
}

impl YostConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: YostConfig::default(),
        }
    }

    pub fn records(mut self, records: RecordsConfig) -> Self {
        self.config.records = records;
        self
    }

    pub fn blobs(mut self, blobs: BlobsConfig) -> Self {
        self.config.blobs = blobs;
        self
    }

    pub fn holdings(mut self, holdings: HoldingsConfig) -> Self {
        self.config.holdings = holdings;
        self
    }

    pub fn build(self) -> YostConfig {
        self.config
    }
}

/// Which store implementation backs a section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecordsConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Root directory for the file backend (defaults to `~/.yost/records`).
    #[serde(default)]
    pub path: Option<String>,
}

impl RecordsConfig {
    /// Directory used by the file backend.
    pub fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_path(self.path.as_deref(), "records")
    }
}

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobsConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Root directory for the file backend (defaults to `~/.yost/blobs`).
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            bucket: default_bucket(),
        }
    }
}

impl BlobsConfig {
    /// Directory used by the file backend.
    pub fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_path(self.path.as_deref(), "blobs")
    }
}

fn default_bucket() -> String {
    "yost".to_string()
}

/// Holdings provider link settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldingsConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_country_codes")]
    pub country_codes: Vec<String>,
}

impl Default for HoldingsConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            language: default_language(),
            country_codes: default_country_codes(),
        }
    }
}

fn default_app_name() -> String {
    "YOST".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_country_codes() -> Vec<String> {
    vec!["US".to_string()]
}

fn resolve_path(explicit: Option<&str>, leaf: &'static str) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_DATA_DIR).join(leaf))
        .ok_or(ConfigError::NoDefaultPath(leaf))
}

#[cfg(test)]
mod tests {
    use super::{BlobsConfig, RecordsConfig, StoreBackend, YostConfig};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn defaults_match_documented_values() {
        let config = YostConfig::default();
        assert_eq!(config.records.backend, StoreBackend::File);
        assert_eq!(config.blobs.bucket, "yost");
        assert_eq!(config.holdings.app_name, "YOST");
        assert_eq!(config.holdings.country_codes, vec!["US".to_string()]);
    }

    #[test]
    fn explicit_paths_win() {
        let records = RecordsConfig {
            path: Some("/data/records".to_string()),
            ..RecordsConfig::default()
        };
        assert_eq!(
            records.resolved_path().expect("path"),
            PathBuf::from("/data/records")
        );
    }

    #[test]
    fn builder_replaces_sections() {
        let config = YostConfig::builder()
            .blobs(BlobsConfig {
                bucket: "media".to_string(),
                ..BlobsConfig::default()
            })
            .build();
        assert_eq!(config.blobs.bucket, "media");
        assert_eq!(config.records, RecordsConfig::default());
    }
}
