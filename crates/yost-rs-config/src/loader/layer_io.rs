//! Layer discovery and file reading.

use super::{
    ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, LayeredConfigOptions,
    LoadedLayer, paths, schema,
};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Candidate layers after requirements, in merge order.
///
/// Each entry carries whether the file must exist. A file reachable through
/// two local sources is only listed for the first one.
pub(super) fn discover(
    options: &LayeredConfigOptions,
    cwd: &Path,
) -> Vec<(ConfigLayerSource, PathBuf, bool)> {
    let mut candidates = Vec::new();
    let fixed = [
        (ConfigLayerSource::System, &options.system_config_path),
        (ConfigLayerSource::User, &options.user_config_path),
    ];
    for (source, path) in fixed {
        if let Some(path) = path {
            candidates.push((source, path.clone(), false));
        }
    }

    let project_root = paths::project_root(cwd, &options.project_root_markers);
    let mut local = Vec::new();
    if let Some(root) = &project_root {
        local.push((ConfigLayerSource::Project, root.join(DEFAULT_CONFIG_FILE)));
    }
    local.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE)));
    if let Some(root) = &project_root {
        local.push((
            ConfigLayerSource::Repo,
            root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
        ));
    }

    let mut seen: HashSet<PathBuf> = candidates
        .iter()
        .map(|(_, path, _)| paths::resolved(path))
        .collect();
    for (source, path) in local {
        if seen.insert(paths::resolved(&path)) {
            candidates.push((source, path, false));
        } else {
            debug!("{} layer {} already listed", source.name(), path.display());
        }
    }

    candidates.extend(
        options
            .runtime_paths
            .iter()
            .map(|path| (ConfigLayerSource::Runtime, path.clone(), true)),
    );
    candidates
}

/// Read and schema-check one layer.
///
/// A missing optional file yields `Ok(None)`; a missing required file is an error.
pub(super) fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    required: bool,
) -> Result<Option<LoadedLayer>, ConfigError> {
    if !required && !path.exists() {
        debug!("no {} layer at {}", source.name(), path.display());
        return Ok(None);
    }
    let value: Value = json5::from_str(&fs::read_to_string(path)?)?;
    let label = format!("{}({})", source.name(), path.display());
    schema::validate_layer_schema(&value, &label)?;
    debug!("read {} layer {}", source.name(), path.display());
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    }))
}

/// `~/.yost/yost.json5`, when a home directory is known.
pub(super) fn user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}
