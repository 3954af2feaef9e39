//! Generic configuration document - safe parsing and typed navigation.
//!
//! `serde_yml` only ever builds plain data. Explicit tags (`!python/object`,
//! `!custom`) are rejected outright so a document cannot smuggle in
//! anything that a downstream consumer might interpret as a constructor.

use serde_yml::{Mapping, Value};

use crate::error::{ConfigError, Result};

pub const ROOT: &str = "document";

/// Parses `text` into the generic document tree.
pub fn parse_document(text: &str) -> Result<Value> {
    let value: Value =
        serde_yml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;

    if value.is_null() {
        return Err(ConfigError::Parse("empty document".to_string()));
    }

    reject_tags(&value, ROOT)?;
    Ok(value)
}

fn reject_tags(value: &Value, location: &str) -> Result<()> {
    match value {
        Value::Tagged(tagged) => Err(ConfigError::Parse(format!(
            "tagged value {} is not allowed at {}",
            tagged.tag, location
        ))),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| reject_tags(item, &child(location, &i.to_string()))),
        Value::Mapping(map) => map.iter().try_for_each(|(k, v)| {
            let key_location = child(location, &key_label(k));
            reject_tags(k, &key_location)?;
            reject_tags(v, &key_location)
        }),
        _ => Ok(()),
    }
}

/// Joins a dotted location with a child key.
pub fn child(location: &str, key: &str) -> String {
    if location.is_empty() || location == ROOT {
        key.to_string()
    } else {
        format!("{location}.{key}")
    }
}

/// Short printable form of a mapping key, used in locations.
pub fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => kind(other).to_string(),
    }
}

/// Type name of a node, for shape errors.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

pub fn as_mapping<'a>(value: &'a Value, location: &str) -> Result<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| ConfigError::shape(location, "mapping", kind(value)))
}

/// Looks up `key` in the mapping at `location`. Null counts as absent.
pub fn require<'a>(value: &'a Value, key: &str, location: &str) -> Result<&'a Value> {
    let map = as_mapping(value, location)?;
    match map.get(key) {
        Some(found) if !found.is_null() => Ok(found),
        _ => Err(ConfigError::missing(location, key)),
    }
}

pub fn require_mapping<'a>(value: &'a Value, key: &str, location: &str) -> Result<&'a Mapping> {
    as_mapping(require(value, key, location)?, &child(location, key))
}

pub fn require_bool(value: &Value, key: &str, location: &str) -> Result<bool> {
    let found = require(value, key, location)?;
    found
        .as_bool()
        .ok_or_else(|| ConfigError::shape(child(location, key), "boolean", kind(found)))
}

pub fn require_int(value: &Value, key: &str, location: &str) -> Result<i64> {
    let found = require(value, key, location)?;
    found
        .as_i64()
        .ok_or_else(|| ConfigError::shape(child(location, key), "integer", kind(found)))
}

pub fn require_str<'a>(value: &'a Value, key: &str, location: &str) -> Result<&'a str> {
    let found = require(value, key, location)?;
    found
        .as_str()
        .ok_or_else(|| ConfigError::shape(child(location, key), "string", kind(found)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_mapping() {
        let doc = parse_document("meta:\n  root_dir: /tmp\n").unwrap();
        assert_eq!(require_str(&doc["meta"], "root_dir", "meta").unwrap(), "/tmp");
    }

    #[test]
    fn test_rejects_malformed() {
        let err = parse_document("colors: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(parse_document(""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_tagged_nodes() {
        let text = "meta:\n  root_dir: !python/object/apply:os.system [\"ls\"]\n";
        let err = parse_document(text).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(msg.contains("meta.root_dir"), "{msg}");
    }

    #[test]
    fn test_null_is_missing() {
        let doc = parse_document("meta:\n  root_dir: ~\n").unwrap();
        let err = require(&doc["meta"], "root_dir", "meta").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "root_dir"));
    }

    #[test]
    fn test_wrong_type_is_shape() {
        let doc = parse_document("logo:\n  accept: \"yes\"\n").unwrap();
        let err = require_bool(&doc["logo"], "accept", "logo").unwrap_err();
        match err {
            ConfigError::Shape { location, expected, found } => {
                assert_eq!(location, "logo.accept");
                assert_eq!(expected, "boolean");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_child_location() {
        assert_eq!(child(ROOT, "colors"), "colors");
        assert_eq!(child("colors", "warm"), "colors.warm");
    }
}
