//! JSON merge helpers for layered configuration.

use serde_json::Value;

/// Recursively merge `overlay` into `base`; non-object values replace.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value.clone(),
    }
}

/// Merge `overlay` into `base`, leaving keys locked by `constraints` untouched.
///
/// Returns the dotted paths of overrides that were dropped.
pub(super) fn merge_json_with_constraints(
    base: &mut Value,
    overlay: &Value,
    constraints: Option<&Value>,
) -> Vec<String> {
    let mut skipped = Vec::new();
    merge_constrained(base, overlay, constraints, "", &mut skipped);
    skipped
}

fn merge_constrained(
    base: &mut Value,
    overlay: &Value,
    constraints: Option<&Value>,
    path: &str,
    skipped: &mut Vec<String>,
) {
    let constraint_map = match constraints {
        None => {
            merge_json_values(base, overlay);
            return;
        }
        Some(Value::Object(map)) => map,
        Some(_) => {
            skipped.push(path.to_string());
            return;
        }
    };
    let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut *base, overlay) else {
        skipped.push(path.to_string());
        return;
    };
    for (key, value) in overlay_map {
        let key_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match constraint_map.get(key) {
            None => match base_map.get_mut(key) {
                Some(existing) => merge_json_values(existing, value),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            },
            Some(constraint) if constraint.is_object() => {
                let entry = base_map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                merge_constrained(entry, value, Some(constraint), &key_path, skipped);
            }
            Some(_) => skipped.push(key_path),
        }
    }
}
