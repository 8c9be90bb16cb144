//! Layered `yost.json5` loading.
//!
//! Layers are discovered from fixed system and user locations, from the
//! project around the working directory, and from explicit runtime paths.
//! They are merged lowest precedence first; keys set by the requirements
//! layer cannot be changed by any later layer.

mod layer_io;
mod merge;
mod schema;
mod paths;

#[cfg(test)]
mod tests;

use crate::{ConfigError, YostConfig};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "yost.json5";
const DEFAULT_CONFIG_DIR: &str = ".yost";
const PROJECT_MARKERS: &[&str] = &[".git"];

#[cfg(unix)]
const SYSTEM_DIR: &str = "/etc/yost";
#[cfg(windows)]
const SYSTEM_DIR: &str = "C:\\ProgramData\\yost";
#[cfg(not(any(unix, windows)))]
const SYSTEM_DIR: &str = "";

const REQUIREMENTS_FILE: &str = "requirements.json5";

/// Result of a layered load.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: YostConfig,
    /// Files that were read, in merge order. Requirements come first.
    pub layers: Vec<ConfigLayer>,
    /// Dotted keys a layer tried to change although requirements lock them.
    pub locked_overrides: Vec<String>,
}

/// Where a layer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Administrator constraints; keys here always win.
    Requirements,
    System,
    /// `~/.yost/yost.json5`.
    User,
    /// `yost.json5` at the project root.
    Project,
    /// `yost.json5` in the working directory.
    Cwd,
    /// `.yost/yost.json5` under the project root.
    Repo,
    /// Paths passed explicitly, e.g. `--config`.
    Runtime,
}

impl ConfigLayerSource {
    fn name(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::System => "system",
            Self::User => "user",
            Self::Project => "project",
            Self::Cwd => "cwd",
            Self::Repo => "repo",
            Self::Runtime => "runtime",
        }
    }
}

/// A file that contributed to the effective config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Locations consulted by [`YostConfig::load_layered_with_options`].
///
/// `None` disables a fixed location.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    pub cwd: PathBuf,
    pub system_config_path: Option<PathBuf>,
    pub user_config_path: Option<PathBuf>,
    pub requirements_path: Option<PathBuf>,
    /// Explicit layers merged after every discovered one. They must exist.
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks a directory as the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Every standard location, with local layers resolved from `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        let system_dir = (!SYSTEM_DIR.is_empty()).then(|| PathBuf::from(SYSTEM_DIR));
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: system_dir.as_ref().map(|dir| dir.join(DEFAULT_CONFIG_FILE)),
            user_config_path: layer_io::user_config_path(),
            requirements_path: system_dir.map(|dir| dir.join(REQUIREMENTS_FILE)),
            runtime_paths: Vec::new(),
            project_root_markers: PROJECT_MARKERS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Skip the system, user and requirements locations.
    pub fn local_only(cwd: impl AsRef<Path>) -> Self {
        Self {
            system_config_path: None,
            user_config_path: None,
            requirements_path: None,
            ..Self::new(cwd)
        }
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl YostConfig {
    /// Read one file without any layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("reading config file {}", path.display());
        Self::load_from_str(&fs::read_to_string(path)?)
    }

    /// Parse JSON5 text without any layering.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("parsing inline config ({} bytes)", contents.len());
        config_from_value(json5::from_str(contents)?, "config")
    }

    /// Layered load from the standard locations around `cwd`.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Layered load from explicit locations.
    ///
    /// Merge order: requirements, system, user, project, cwd, repo, runtime.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = paths::resolved(&options.cwd);
        let requirements = match options.requirements_path.as_deref() {
            Some(path) => layer_io::read_layer(ConfigLayerSource::Requirements, path, false)?,
            None => None,
        };

        let mut merged = Value::Object(Map::new());
        let mut layers = Vec::new();
        if let Some(requirements) = &requirements {
            merge::merge_json_values(&mut merged, &requirements.value);
            layers.push(requirements.meta.clone());
        }
        let constraints = requirements.as_ref().map(|layer| &layer.value);

        let mut locked_overrides = Vec::new();
        for (source, path, required) in layer_io::discover(&options, &cwd) {
            let Some(layer) = layer_io::read_layer(source, &path, required)? else {
                continue;
            };
            for key in merge::merge_json_with_constraints(&mut merged, &layer.value, constraints)
            {
                warn!(
                    "{} layer {} cannot override locked key {}",
                    source.name(),
                    path.display(),
                    key
                );
                locked_overrides.push(key);
            }
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "effective config built from {} layer(s), {} locked override(s) ignored",
            layers.len(),
            locked_overrides.len()
        );
        Ok(LayeredConfig {
            config,
            layers,
            locked_overrides,
        })
    }

    /// Cross-field checks run after decoding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let problem = if self.blobs.bucket.trim().is_empty() {
            "blobs.bucket must not be empty"
        } else if self.holdings.app_name.trim().is_empty() {
            "holdings.app_name must not be empty"
        } else if self.holdings.country_codes.is_empty() {
            "holdings.country_codes must list at least one country"
        } else {
            return Ok(());
        };
        Err(ConfigError::Invalid(problem.to_string()))
    }
}

/// Parsed layer and where it came from.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<YostConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: YostConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
