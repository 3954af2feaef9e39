//! Scalar mapping keys.
//!
//! YAML keys arrive as whatever scalar the author wrote (`0`, `"0"`,
//! `"#FF0000"`). Palette slots are normalized to [`SlotIndex`] as soon as
//! they are read; `color_map` keys are kept as [`SlotKey`] untouched.

use serde::{Serialize, Serializer};
use serde_yml::Value;
use std::fmt;

use crate::color::Color;
use crate::document::kind;
use crate::error::{ConfigError, Result};

/// Index of a color within a palette.
pub type SlotIndex = u32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKey {
    Int(i64),
    Text(String),
}

impl SlotKey {
    /// Reads a scalar mapping key. Floats, nulls and collections are refused.
    pub fn from_value(value: &Value, location: &str) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(SlotKey::Int)
                .ok_or_else(|| ConfigError::shape(location, "integer or string key", kind(value))),
            Value::String(s) => Ok(SlotKey::Text(s.clone())),
            Value::Bool(b) => Ok(SlotKey::Text(b.to_string())),
            other => Err(ConfigError::shape(
                location,
                "integer or string key",
                kind(other),
            )),
        }
    }

    /// Reads a textual key as a `#RRGGBB` color, the form template authors
    /// use to name the color being replaced. Other keys yield `None`.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            SlotKey::Text(s) => Color::from_hex(s).ok(),
            SlotKey::Int(_) => None,
        }
    }

    /// Interprets this key as a palette slot index.
    pub fn to_slot_index(&self, location: &str) -> Result<SlotIndex> {
        let parsed = match self {
            SlotKey::Int(i) => SlotIndex::try_from(*i).ok(),
            SlotKey::Text(s) => s.trim().parse::<SlotIndex>().ok(),
        };
        parsed.ok_or_else(|| {
            ConfigError::shape(location, "non-negative slot index", format!("'{self}'"))
        })
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Int(i) => write!(f, "{i}"),
            SlotKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SlotKey {
    fn from(i: i64) -> Self {
        SlotKey::Int(i)
    }
}

impl From<&str> for SlotKey {
    fn from(s: &str) -> Self {
        SlotKey::Text(s.to_string())
    }
}

// Serialized as its display form so it can key a JSON object.
impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Reads a palette slot index from a value position (e.g. `color_map` values).
pub fn slot_index_value(value: &Value, location: &str) -> Result<SlotIndex> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| SlotIndex::try_from(i).ok())
            .ok_or_else(|| ConfigError::shape(location, "non-negative slot index", n.to_string())),
        other => Err(ConfigError::shape(
            location,
            "non-negative slot index",
            kind(other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(yaml: &str) -> Value {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_integer_and_text_keys() {
        assert_eq!(SlotKey::from_value(&key("3"), "k").unwrap(), SlotKey::Int(3));
        assert_eq!(
            SlotKey::from_value(&key("\"#FF0000\""), "k").unwrap(),
            SlotKey::from("#FF0000")
        );
    }

    #[test]
    fn test_rejects_float_key() {
        let err = SlotKey::from_value(&key("1.5"), "colors.warm").unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn test_slot_index_normalization() {
        assert_eq!(SlotKey::Int(7).to_slot_index("k").unwrap(), 7);
        assert_eq!(SlotKey::from("12").to_slot_index("k").unwrap(), 12);
        assert!(SlotKey::Int(-1).to_slot_index("k").is_err());
        assert!(SlotKey::from("primary").to_slot_index("k").is_err());
    }

    #[test]
    fn test_slot_index_value() {
        assert_eq!(slot_index_value(&key("2"), "v").unwrap(), 2);
        assert!(slot_index_value(&key("-2"), "v").is_err());
        assert!(slot_index_value(&key("\"2\""), "v").is_err());
    }

    #[test]
    fn test_as_color() {
        assert_eq!(SlotKey::from("#FF8000").as_color(), Some(Color::new(255, 128, 0)));
        assert_eq!(SlotKey::from("00ff00").as_color(), Some(Color::new(0, 255, 0)));
        assert_eq!(SlotKey::from("primary").as_color(), None);
        assert_eq!(SlotKey::Int(0).as_color(), None);
    }

    #[test]
    fn test_ordering_ints_before_text() {
        let mut keys = vec![SlotKey::from("a"), SlotKey::Int(2), SlotKey::Int(1)];
        keys.sort();
        assert_eq!(keys, vec![SlotKey::Int(1), SlotKey::Int(2), SlotKey::from("a")]);
    }
}
