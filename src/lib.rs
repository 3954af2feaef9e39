//! GDNSGDB Core - palette and meta template configuration model
//!
//! A YAML document declares named palettes and "meta templates" (a template
//! image, a color map into palette slots, and optional logo placement).
//! [`ConfigurationModel`] parses it, validates it, and loads the template
//! images, producing a read-only model for the compositing stage.

pub mod color;
pub mod document;
pub mod error;
pub mod hashing;
pub mod image;
pub mod key;
pub mod model;
pub mod palette;
pub mod templates;

pub use color::Color;
pub use error::{ColorError, ConfigError, ImageLoadFailure, Result};
pub use hashing::document_fingerprint;
pub use image::{ImageLoader, PngLoader, TemplateImage};
pub use key::{SlotIndex, SlotKey};
pub use model::{ConfigurationModel, ModelSummary, TemplateSummary};
pub use palette::{Palette, PaletteRegistry};
pub use templates::{
    describe_section, LogoAlign, LogoPlacement, LogoRegion, MetaTemplate, MetaTemplateRegistry,
    MetaTemplateSpec,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
