//! # Firebase
//!
//! Chat pages talk to Firebase directly from the browser. The server only
//! hands over the client configuration and app id, embedded in the page as
//! `window.__firebase_config` and `window.__app_id`.
//!
//! Messaging, persistence and fan-out all live in Firebase.
use serde_json::{Map, Value};
use tracing::warn;

/// Missing config is an empty object. Malformed or non-object config is also
/// an empty object, with a warning, so the pages still render.
pub fn parse_firebase_config(raw: Option<&str>) -> Map<String, Value> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("FIREBASE_CONFIG is not a JSON object ({other}), using empty config");
            Map::new()
        }
        Err(e) => {
            warn!("FIREBASE_CONFIG is not valid JSON ({e}), using empty config");
            Map::new()
        }
    }
}

/// Serializes for a `<script>` block. `<`, `>` and `&` are escaped so a value
/// can never close the element.
pub fn to_script_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

pub fn client_script(config: &Map<String, Value>, app_id: &str) -> String {
    format!(
        "window.__firebase_config = {};\nwindow.__app_id = {};",
        to_script_literal(config),
        to_script_literal(app_id)
    )
}
