//! RGB color values with `#RRGGBB` and channel-tuple conversions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// An RGB color. Immutable value type; channels are 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB` or `RRGGBB` (case-insensitive).
    ///
    /// At most one leading `#` is stripped. Anything other than exactly six
    /// hex digits afterwards is rejected.
    pub fn from_hex(text: &str) -> Result<Self, ColorError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(text.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHexDigit(text.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::InvalidHexDigit(text.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Builds a color from the first three values of `channels`.
    pub fn from_channels(channels: &[u8]) -> Result<Self, ColorError> {
        match channels {
            [red, green, blue, ..] => Ok(Self::new(*red, *green, *blue)),
            _ => Err(ColorError::TooFewChannels(channels.len())),
        }
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    pub fn to_channels(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(color: Color) -> Self {
        color.to_channels()
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_channels() {
        let color = Color::from_hex("#FF00A0").unwrap();
        assert_eq!(color.to_channels(), (255, 0, 160));
    }

    #[test]
    fn test_hash_prefix_optional() {
        assert_eq!(Color::from_hex("1a2b3c").unwrap().to_hex(), "#1A2B3C");
    }

    #[test]
    fn test_hex_round_trip_uppercases() {
        for s in ["#000000", "#ffffff", "#0a0B0c", "#7f80FE"] {
            let color = Color::from_hex(s).unwrap();
            assert_eq!(color.to_hex(), s.to_uppercase());
        }
    }

    #[test]
    fn test_channel_round_trip() {
        for (r, g, b) in [(0, 0, 0), (255, 255, 255), (1, 128, 254)] {
            let color = Color::from_channels(&[r, g, b, 99]).unwrap();
            assert_eq!(color.to_channels(), (r, g, b));
        }
    }

    #[test]
    fn test_rejects_short_and_long() {
        assert_eq!(
            Color::from_hex("#FFF"),
            Err(ColorError::InvalidLength("#FFF".to_string()))
        );
        assert!(matches!(
            Color::from_hex("#FF00FF00"),
            Err(ColorError::InvalidLength(_))
        ));
        assert!(matches!(
            Color::from_hex("##FF00FF"),
            Err(ColorError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!(matches!(
            Color::from_hex("#GG0000"),
            Err(ColorError::InvalidHexDigit(_))
        ));
        // from_str_radix alone would accept a sign
        assert!(matches!(
            Color::from_hex("+F0000"),
            Err(ColorError::InvalidHexDigit(_))
        ));
        // multi-byte chars must not panic on slicing
        assert!(Color::from_hex("#éé00").is_err());
    }

    #[test]
    fn test_too_few_channels() {
        assert_eq!(
            Color::from_channels(&[1, 2]),
            Err(ColorError::TooFewChannels(2))
        );
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::new(18, 52, 86)).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: Color = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(back, Color::new(18, 52, 86));
    }
}
