//! Configuration model - single entry point for loading a configuration.
//!
//! Load order is fixed: parse, palettes, then meta templates. A model is
//! immutable once built; reloading swaps in a complete new model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::color::Color;
use crate::document::{parse_document, require, require_str, ROOT};
use crate::error::Result;
use crate::hashing::document_fingerprint;
use crate::image::{ImageLoader, PngLoader};
use crate::key::{SlotIndex, SlotKey};
use crate::palette::{Palette, PaletteRegistry};
use crate::templates::{LogoAlign, MetaTemplate, MetaTemplateRegistry, MetaTemplateSpec};

pub const COLORS_KEY: &str = PaletteRegistry::SECTION;
pub const META_KEY: &str = "meta";
pub const ROOT_DIR_KEY: &str = "root_dir";
pub const META_TEMPLATES_KEY: &str = MetaTemplateSpec::SECTION;

#[derive(Debug, Clone)]
pub struct ConfigurationModel {
    conf: Value,
    root_dir: PathBuf,
    palettes: PaletteRegistry,
    meta_templates: MetaTemplateRegistry,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
}

impl ConfigurationModel {
    /// Parses `text` and builds both registries, decoding images with `loader`.
    pub fn load_from_text(text: &str, loader: &dyn ImageLoader) -> Result<Self> {
        let conf = parse_document(text)?;

        // Resolve every required top-level key before any image is opened.
        let colors = require(&conf, COLORS_KEY, ROOT)?;
        let meta = require(&conf, META_KEY, ROOT)?;
        let root_dir = PathBuf::from(require_str(meta, ROOT_DIR_KEY, META_KEY)?);
        let templates_section = require(&conf, META_TEMPLATES_KEY, ROOT)?;

        let palettes = PaletteRegistry::from_section(colors)?;
        let meta_templates = MetaTemplateRegistry::from_section(templates_section, &root_dir, loader)?;
        let fingerprint = document_fingerprint(&conf);

        info!(
            palettes = palettes.len(),
            meta_templates = meta_templates.len(),
            root_dir = %root_dir.display(),
            fingerprint = %fingerprint,
            "Configuration loaded"
        );

        Ok(Self {
            conf,
            root_dir,
            palettes,
            meta_templates,
            fingerprint,
            loaded_at: Utc::now(),
        })
    }

    /// [`load_from_text`](Self::load_from_text) with PNG files from disk.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Self::load_from_text(text, &PngLoader)
    }

    /// Replaces this model with one built from `text`.
    ///
    /// On failure the current model is left exactly as it was.
    pub fn reload(&mut self, text: &str, loader: &dyn ImageLoader) -> Result<()> {
        *self = Self::load_from_text(text, loader)?;
        Ok(())
    }

    pub fn conf(&self) -> &Value {
        &self.conf
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn palettes(&self) -> &PaletteRegistry {
        &self.palettes
    }

    pub fn meta_templates(&self) -> &MetaTemplateRegistry {
        &self.meta_templates
    }

    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn meta_template(&self, name: &str) -> Option<&MetaTemplate> {
        self.meta_templates.get(name)
    }

    /// SHA-256 of the canonical form of the parsed document.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            fingerprint: self.fingerprint.clone(),
            loaded_at: self.loaded_at,
            root_dir: self.root_dir.clone(),
            palettes: self
                .palettes
                .iter()
                .map(|(name, palette)| (name.to_string(), palette.iter().collect()))
                .collect(),
            meta_templates: self
                .meta_templates
                .iter()
                .map(|t| (t.name().to_string(), TemplateSummary::from(t)))
                .collect(),
        }
    }
}

/// Serializable overview of a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub root_dir: PathBuf,
    pub palettes: BTreeMap<String, BTreeMap<SlotIndex, Color>>,
    pub meta_templates: BTreeMap<String, TemplateSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub path: PathBuf,
    pub size: [u32; 2],
    pub color_map: BTreeMap<SlotKey, SlotIndex>,
    pub accept_logo: bool,
    /// top, bottom, left, right
    pub logo_region: [i64; 4],
    pub logo_align: LogoAlign,
}

impl From<&MetaTemplate> for TemplateSummary {
    fn from(template: &MetaTemplate) -> Self {
        let (top, bottom, left, right) = template.logo_region();
        let (width, height) = template.image().dimensions();
        Self {
            path: template.path().to_path_buf(),
            size: [width, height],
            color_map: template.color_map().clone(),
            accept_logo: template.accept_logo(),
            logo_region: [top, bottom, left, right],
            logo_align: template.spec().placement.align.clone(),
        }
    }
}
