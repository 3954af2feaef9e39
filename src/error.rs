//! Error kinds surfaced by configuration loading.
//!
//! Every variant names the location of the offending fragment as a dotted
//! path into the document, e.g. `meta_templates.banner.logo.region.top`.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Boxed failure reported by an [`ImageLoader`](crate::image::ImageLoader).
pub type ImageLoadFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing key '{key}' at {location}")]
    MissingKey { location: String, key: String },

    #[error("Invalid color at {location}: {source}")]
    ColorFormat {
        location: String,
        #[source]
        source: ColorError,
    },

    #[error("Failed to load image for template '{template}' from {}: {source}", .path.display())]
    ImageLoad {
        template: String,
        path: PathBuf,
        #[source]
        source: ImageLoadFailure,
    },

    #[error("Unexpected value at {location}: expected {expected}, found {found}")]
    Shape {
        location: String,
        expected: String,
        found: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(location: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            location: location.into(),
            key: key.into(),
        }
    }

    pub(crate) fn shape(
        location: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Shape {
            location: location.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Failures produced by [`Color`](crate::color::Color) construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("'{0}' is not 6 hex digits (RRGGBB)")]
    InvalidLength(String),

    #[error("'{0}' contains a non-hex digit")]
    InvalidHexDigit(String),

    #[error("expected at least 3 channel values, got {0}")]
    TooFewChannels(usize),
}
