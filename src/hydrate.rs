//! Hydration script fragment generation.
//!
//! The client bundle re-reads request-scoped server data from a well-known
//! global. This module produces the one-line script the host embeds ahead of
//! the bundle's own `<script>` tag.

use serde_json::{Map, Value};

/// Global variable the client entry reads server data from.
pub const SERVER_DATA_GLOBAL: &str = "__SSR_DATA__";

/// Render the executable line assigning the serialized server data to the
/// hydration global.
pub fn server_data_script(data: &Map<String, Value>) -> String {
    let json = serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string());
    format!("window.{SERVER_DATA_GLOBAL} = {json};")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data_from(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_script_line_shape() {
        let script = server_data_script(&data_from(json!({"message": "hi"})));
        assert_eq!(script, r#"window.__SSR_DATA__ = {"message":"hi"};"#);
    }

    #[test]
    fn test_empty_data() {
        let script = server_data_script(&Map::new());
        assert_eq!(script, "window.__SSR_DATA__ = {};");
    }

    #[test]
    fn test_round_trip_deep_equal() {
        let data = data_from(json!({"user": {"name": "ada"}, "count": 3}));
        let script = server_data_script(&data);

        // The embedded payload must parse back to the same value
        let payload = script
            .strip_prefix("window.__SSR_DATA__ = ")
            .and_then(|s| s.strip_suffix(';'))
            .unwrap();
        let parsed: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed, Value::Object(data));
    }
}
