//! Structural checks for a single config layer.
//!
//! Every key is optional here; defaults are applied when the merged value is
//! decoded. Errors name the layer and the dotted key that failed.

use crate::ConfigError;
use serde_json::Value;

/// Accepted shape of a leaf value.
#[derive(Clone, Copy)]
enum Kind {
    Text,
    TextList,
    Backend,
}

const RECORDS: &[(&str, Kind)] = &[("backend", Kind::Backend), ("path", Kind::Text)];
const BLOBS: &[(&str, Kind)] = &[
    ("backend", Kind::Backend),
    ("path", Kind::Text),
    ("bucket", Kind::Text),
];
const HOLDINGS: &[(&str, Kind)] = &[
    ("app_name", Kind::Text),
    ("language", Kind::Text),
    ("country_codes", Kind::TextList),
];
const SECTIONS: &[(&str, &[(&str, Kind)])] = &[
    ("records", RECORDS),
    ("blobs", BLOBS),
    ("holdings", HOLDINGS),
];
const BACKENDS: &[&str] = &["file", "memory"];

pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let fail = |path: &str, message: &str| ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    };
    let Value::Object(root) = value else {
        return Err(fail("root", "expected object"));
    };
    for (name, section) in root {
        if name == "$schema" {
            check_leaf(section, Kind::Text, name)
                .map_err(|(path, message)| fail(path.as_str(), message))?;
            continue;
        }
        let known = SECTIONS.iter().find(|(section_name, _)| section_name == name);
        let Some((_, fields)) = known else {
            return Err(fail(name.as_str(), "unknown key"));
        };
        let Value::Object(entries) = section else {
            return Err(fail(name.as_str(), "expected object"));
        };
        for (key, entry) in entries {
            let path = format!("{name}.{key}");
            let Some((_, kind)) = fields.iter().find(|(field, _)| field == key) else {
                return Err(fail(path.as_str(), "unknown key"));
            };
            check_leaf(entry, *kind, &path)
                .map_err(|(path, message)| fail(path.as_str(), message))?;
        }
    }
    Ok(())
}

/// Check one leaf, returning the offending path and message on failure.
fn check_leaf(value: &Value, kind: Kind, path: &str) -> Result<(), (String, &'static str)> {
    let message = match (kind, value) {
        (Kind::Text, Value::String(_)) => return Ok(()),
        (Kind::Backend, Value::String(backend)) if BACKENDS.contains(&backend.as_str()) => {
            return Ok(());
        }
        (Kind::Backend, Value::String(_)) => "invalid store backend",
        (Kind::TextList, Value::Array(items)) => {
            return match items.iter().position(|item| !item.is_string()) {
                Some(idx) => Err((format!("{path}[{idx}]"), "expected string")),
                None => Ok(()),
            };
        }
        (Kind::TextList, _) => "expected array",
        _ => "expected string",
    };
    Err((path.to_string(), message))
}
