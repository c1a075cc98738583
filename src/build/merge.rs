//! Bundler-configuration merging.
//!
//! The builder always runs with its own override set (forced log level,
//! config-file discovery disabled, entry/output/plugin wiring). A caller's
//! base configuration survives underneath it per this policy:
//!
//! - `build` section: shallow merge, override keys win
//! - `plugins`: concatenated base-then-override, so caller plugins run and
//!   the mandatory Vue transform is appended after them
//! - `define`: shallow merge, override keys win
//! - every other top-level override key replaces the base key outright
//!   (`logLevel` and `configFile` are always present in the override set, so
//!   they are always forced)

use serde_json::{Map, Value};

/// Merge the builder's override set over an optional caller base config.
pub fn merge_build_config(base: Option<&Value>, overrides: &Value) -> Value {
    let mut merged = base
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let Some(override_map) = overrides.as_object() else {
        return Value::Object(merged);
    };

    for (key, value) in override_map {
        match key.as_str() {
            "build" | "define" => {
                let combined = shallow_merge(merged.get(key), value);
                merged.insert(key.clone(), combined);
            }
            "plugins" => {
                let combined = concat_arrays(merged.get(key), value);
                merged.insert(key.clone(), combined);
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    Value::Object(merged)
}

/// Shallow merge of two JSON objects, override keys winning.
fn shallow_merge(base: Option<&Value>, overrides: &Value) -> Value {
    let mut merged: Map<String, Value> =
        base.and_then(Value::as_object).cloned().unwrap_or_default();

    if let Some(override_map) = overrides.as_object() {
        for (key, value) in override_map {
            merged.insert(key.clone(), value.clone());
        }
        Value::Object(merged)
    } else {
        overrides.clone()
    }
}

/// Concatenate two plugin arrays base-then-override; non-arrays replace.
fn concat_arrays(base: Option<&Value>, overrides: &Value) -> Value {
    match (base.and_then(Value::as_array), overrides.as_array()) {
        (Some(base_arr), Some(override_arr)) => {
            let mut combined = base_arr.clone();
            combined.extend(override_arr.iter().cloned());
            Value::Array(combined)
        }
        _ => overrides.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================
