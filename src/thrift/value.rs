//! Resolution of raw constant-value nodes into plain nested values.

use serde_json::{Map, Value};

/// Container keyword prefix resolved by default. Nested elements always go
/// back to this prefix, regardless of what the outermost caller asked for.
pub const DEFAULT_CONST_PREFIX: &str = "const";

/// Maps a raw constant-value node onto a plain value.
///
/// Dispatch is by the node's `type` discriminator, matched case-insensitively:
///
/// - `literal` — the embedded scalar, unchanged;
/// - `<prefix>list` / `<prefix>set` — an array of recursively resolved
///   elements, declaration order preserved;
/// - `<prefix>map` — an array of singleton objects `{key: value}`, one per
///   entry, so declaration order and duplicate keys survive. The key is
///   taken as the entry key's literal `value`, never resolved recursively.
///
/// Anything else yields `None`. Elements that fail to resolve become `null`.
pub fn resolve_const(node: &Value, prefix: &str) -> Option<Value> {
    let style = node.get("type")?.as_str()?.to_ascii_lowercase();

    if style == "literal" {
        return node.get("value").cloned();
    }

    if style == format!("{prefix}list") || style == format!("{prefix}set") {
        let elements = node.get("values")?.as_array()?;
        return Some(Value::Array(
            elements
                .iter()
                .map(|element| {
                    resolve_const(element, DEFAULT_CONST_PREFIX).unwrap_or(Value::Null)
                })
                .collect(),
        ));
    }

    if style == format!("{prefix}map") {
        let entries = node.get("entries")?.as_array()?;
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = match entry.get("key").and_then(|key| key.get("value")) {
                Some(Value::String(key)) => key.clone(),
                Some(other) => other.to_string(),
                None => continue,
            };
            let value = entry
                .get("value")
                .and_then(|value| resolve_const(value, DEFAULT_CONST_PREFIX))
                .unwrap_or(Value::Null);
            let mut singleton = Map::new();
            singleton.insert(key, value);
            resolved.push(Value::Object(singleton));
        }
        return Some(Value::Array(resolved));
    }

    None
}
