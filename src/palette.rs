//! Palette registry - named palettes parsed from the `colors` section.

use serde::Serialize;
use serde_yml::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::color::Color;
use crate::document::{as_mapping, child, key_label, kind};
use crate::error::{ConfigError, Result};
use crate::key::{SlotIndex, SlotKey};

pub type PaletteName = String;

/// Slot index to color, ordered by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    slots: BTreeMap<SlotIndex, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotIndex) -> Option<Color> {
        self.slots.get(&slot).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, Color)> + '_ {
        self.slots.iter().map(|(slot, color)| (*slot, *color))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Parses one palette body (`slot: "#RRGGBB"` pairs) found at `location`.
    pub fn from_value(value: &Value, location: &str) -> Result<Self> {
        let mut slots = BTreeMap::new();

        for (raw_key, raw_color) in as_mapping(value, location)? {
            let slot_location = child(location, &key_label(raw_key));
            let slot = SlotKey::from_value(raw_key, &slot_location)?
                .to_slot_index(&slot_location)?;

            let text = raw_color.as_str().ok_or_else(|| {
                ConfigError::shape(&slot_location, "hex color string", kind(raw_color))
            })?;
            let color = Color::from_hex(text).map_err(|source| ConfigError::ColorFormat {
                location: slot_location.clone(),
                source,
            })?;

            // `0` and `"0"` are distinct YAML keys but the same slot
            if slots.insert(slot, color).is_some() {
                return Err(ConfigError::shape(
                    slot_location,
                    "unique slot index",
                    format!("duplicate slot {slot}"),
                ));
            }
        }

        Ok(Self { slots })
    }
}

impl FromIterator<(SlotIndex, Color)> for Palette {
    fn from_iter<T: IntoIterator<Item = (SlotIndex, Color)>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Palette registry - all palettes of one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteRegistry {
    palettes: BTreeMap<PaletteName, Palette>,
}

impl PaletteRegistry {
    pub const SECTION: &'static str = "colors";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from the `colors` section.
    pub fn from_section(section: &Value) -> Result<Self> {
        let mut palettes = BTreeMap::new();

        for (raw_name, body) in as_mapping(section, Self::SECTION)? {
            let name = raw_name.as_str().map(str::to_string).ok_or_else(|| {
                ConfigError::shape(
                    child(Self::SECTION, &key_label(raw_name)),
                    "palette name string",
                    kind(raw_name),
                )
            })?;
            let palette = Palette::from_value(body, &child(Self::SECTION, &name))?;
            debug!(palette = %name, slots = palette.len(), "Loaded palette");
            palettes.insert(name, palette);
        }

        Ok(Self { palettes })
    }

    /// Replaces every palette with those in `section`.
    ///
    /// On failure the registry keeps its previous contents.
    pub fn load(&mut self, section: &Value) -> Result<()> {
        *self = Self::from_section(section)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.palettes.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Palette)> {
        self.palettes.iter().map(|(name, palette)| (name.as_str(), palette))
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn register(&mut self, name: impl Into<PaletteName>, palette: Palette) {
        self.palettes.insert(name.into(), palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(yaml: &str) -> Value {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_load_warm_palette() {
        let registry =
            PaletteRegistry::from_section(&section("warm:\n  0: \"#FF0000\"\n  1: \"#00FF00\"\n"))
                .unwrap();
        let warm = registry.get("warm").unwrap();
        assert_eq!(warm.get(0), Some(Color::new(255, 0, 0)));
        assert_eq!(warm.get(1), Some(Color::new(0, 255, 0)));
        assert_eq!(warm.len(), 2);
    }

    #[test]
    fn test_bad_color_names_palette_and_slot() {
        let err = PaletteRegistry::from_section(&section("warm:\n  3: \"#XYZ\"\n")).unwrap_err();
        match err {
            ConfigError::ColorFormat { location, .. } => assert_eq!(location, "colors.warm.3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_color_is_shape_error() {
        let err = PaletteRegistry::from_section(&section("warm:\n  0: 16711680\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn test_section_must_be_mapping() {
        let err = PaletteRegistry::from_section(&section("- \"#FF0000\"\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { ref location, .. } if location == "colors"));
    }

    #[test]
    fn test_duplicate_normalized_slot() {
        let err = PaletteRegistry::from_section(&section(
            "warm:\n  0: \"#FF0000\"\n  \"0\": \"#00FF00\"\n",
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn test_failed_load_leaves_registry_untouched() {
        let mut registry = PaletteRegistry::new();
        registry.load(&section("cool:\n  0: \"#0000FF\"\n")).unwrap();

        let result = registry.load(&section("warm:\n  0: \"#FF0000\"\n  1: \"nope\"\n"));
        assert!(result.is_err());
        assert_eq!(registry.names(), vec!["cool"]);
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut registry = PaletteRegistry::new();
        registry.load(&section("cool:\n  0: \"#0000FF\"\n")).unwrap();
        registry.load(&section("warm:\n  0: \"#FF0000\"\n")).unwrap();
        assert_eq!(registry.names(), vec!["warm"]);
    }

    #[test]
    fn test_register_adds_or_replaces_by_name() {
        let mut registry = PaletteRegistry::new();
        assert!(registry.is_empty());

        registry.register("mono", [(0, Color::new(1, 1, 1))].into_iter().collect());
        registry.register("mono", [(5, Color::new(9, 9, 9))].into_iter().collect());

        assert_eq!(registry.len(), 1);
        let mono = registry.get("mono").unwrap();
        assert_eq!(mono.get(0), None);
        assert_eq!(mono.get(5), Some(Color::new(9, 9, 9)));
    }
}
