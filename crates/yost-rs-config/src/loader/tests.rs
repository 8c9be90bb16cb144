//! Tests for layered configuration loading.

use super::*;
use crate::StoreBackend;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Project with a `.git` marker and a nested working directory.
fn project(temp: &TempDir) -> (PathBuf, PathBuf) {
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");
    (project_root, cwd)
}

#[test]
fn parse_minimal_config() {
    let config = YostConfig::load_from_str("{}").expect("config");
    assert_eq!(config, YostConfig::default());
}

#[test]
fn parses_all_sections() {
    let config = YostConfig::load_from_str(
        r#"{
            // comments are allowed
            records: { backend: "memory" },
            blobs: { path: "/srv/blobs", bucket: "media" },
            holdings: { app_name: "Demo", country_codes: ["US", "CA"] },
        }"#,
    )
    .expect("config");
    assert_eq!(config.records.backend, StoreBackend::Memory);
    assert_eq!(config.blobs.path.as_deref(), Some("/srv/blobs"));
    assert_eq!(config.blobs.bucket, "media");
    assert_eq!(config.holdings.app_name, "Demo");
    assert_eq!(config.holdings.language, "en");
    assert_eq!(
        config.holdings.country_codes,
        vec!["US".to_string(), "CA".to_string()]
    );
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = YostConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_invalid_backend() {
    let err = YostConfig::load_from_str(r#"{ records: { backend: "dynamo" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("records.backend"), "{msg}");
}

#[test]
fn rejects_non_string_country_code() {
    let err = YostConfig::load_from_str(r#"{ holdings: { country_codes: ["US", 1] } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("holdings.country_codes[1]"));
}

#[test]
fn rejects_empty_bucket() {
    let err = YostConfig::load_from_str(r#"{ blobs: { bucket: " " } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

/// Repo config takes precedence over cwd and project configs.
#[test]
fn layered_config_prefers_repo_over_cwd() {
    let temp = TempDir::new().expect("tmp");
    let (project_root, cwd) = project(&temp);

    let user_config = temp.path().join("user.json5");
    write_json5(&user_config, r#"{ blobs: { bucket: "user" } }"#);
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ blobs: { bucket: "project" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ blobs: { bucket: "cwd" }, records: { backend: "memory" } }"#,
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
        r#"{ blobs: { bucket: "repo" } }"#,
    );

    let mut options = LayeredConfigOptions::local_only(&cwd);
    options.user_config_path = Some(user_config);

    let layered = YostConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.blobs.bucket, "repo");
    assert_eq!(layered.config.records.backend, StoreBackend::Memory);
    let sources: Vec<ConfigLayerSource> =
        layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Repo,
        ]
    );
}

#[test]
fn requirements_lock_overrides() {
    let temp = TempDir::new().expect("tmp");
    let (_project_root, cwd) = project(&temp);

    let requirements = temp.path().join("requirements.json5");
    write_json5(&requirements, r#"{ blobs: { bucket: "locked" } }"#);
    let runtime = temp.path().join("runtime.json5");
    write_json5(
        &runtime,
        r#"{ blobs: { bucket: "runtime", path: "/tmp/blobs" } }"#,
    );

    let mut options = LayeredConfigOptions::local_only(&cwd).with_runtime_path(&runtime);
    options.requirements_path = Some(requirements);

    let layered = YostConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.blobs.bucket, "locked");
    assert_eq!(layered.config.blobs.path.as_deref(), Some("/tmp/blobs"));
    assert_eq!(layered.locked_overrides, vec!["blobs.bucket".to_string()]);
}

#[test]
fn runtime_override_wins_without_constraints() {
    let temp = TempDir::new().expect("tmp");
    let (_project_root, cwd) = project(&temp);

    let system = temp.path().join("system.json5");
    write_json5(&system, r#"{ holdings: { app_name: "system" } }"#);
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, r#"{ holdings: { app_name: "runtime" } }"#);

    let mut options = LayeredConfigOptions::local_only(&cwd).with_runtime_path(&runtime);
    options.system_config_path = Some(system);

    let layered = YostConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.holdings.app_name, "runtime");
    assert!(layered.locked_overrides.is_empty());
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = LayeredConfigOptions::local_only(temp.path())
        .with_runtime_path(temp.path().join("absent.json5"));
    let err = YostConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn schema_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, r#"{ records: { path: 3 } }"#);
    let options = LayeredConfigOptions::local_only(temp.path()).with_runtime_path(&runtime);
    let msg = format!(
        "{}",
        YostConfig::load_layered_with_options(options).unwrap_err()
    );
    assert!(msg.contains("runtime("), "{msg}");
    assert!(msg.contains("records.path"), "{msg}");
}
