//! Configuration fingerprints - SHA-256 over canonical JSON.
//!
//! Two documents that differ only in key order, value quoting or comments share
//! a fingerprint.

use serde_json::Value;
use serde_yml::Value as YamlValue;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Canonical JSON text (sorted keys, no whitespace)
pub fn canonical_json(value: &Value) -> String {
    sort_value(value).to_string()
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// JSON view of a configuration document.
///
/// Mapping keys become the canonical JSON text of the key itself, so the
/// integer key `0` maps to `0` and the string key `"0"` to `"\"0\""`.
pub fn to_json(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (canonical_json(&to_json(k)), to_json(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => to_json(&tagged.value),
    }
}

/// Fingerprint of a parsed configuration document.
pub fn document_fingerprint(document: &YamlValue) -> String {
    let canonical = canonical_json(&to_json(document));
    sha256_hex(canonical.as_bytes())
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(text: &str) -> YamlValue {
        serde_yml::from_str(text).unwrap()
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj);
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_hash_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_ignores_key_order_and_comments() {
        let a = yaml("colors:\n  warm:\n    0: \"#FF0000\"\nmeta:\n  root_dir: x\n");
        let b = yaml("# palettes last\nmeta: { root_dir: x }\ncolors: { warm: { 0: \"#FF0000\" } }\n");
        assert_eq!(document_fingerprint(&a), document_fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = yaml("meta: { root_dir: x }\n");
        let b = yaml("meta: { root_dir: y }\n");
        assert_ne!(document_fingerprint(&a), document_fingerprint(&b));
    }

    #[test]
    fn test_keys_keep_their_type() {
        let json = to_json(&yaml("0: a\n\"1\": b\n"));
        assert_eq!(json, json!({"0": "a", "\"1\"": "b"}));
    }

    #[test]
    fn test_fingerprint_distinguishes_integer_and_string_keys() {
        let both = yaml("color_map: { 0: 1, \"0\": 2 }\n");
        let text_only = yaml("color_map: { \"0\": 2 }\n");
        let int_only = yaml("color_map: { 0: 2 }\n");
        assert_ne!(document_fingerprint(&both), document_fingerprint(&text_only));
        assert_ne!(document_fingerprint(&int_only), document_fingerprint(&text_only));
    }
}
