//! Meta templates - one physical template image recolorable against any palette.
//!
//! Loading happens in two phases. [`MetaTemplateSpec`] is the validated
//! descriptor with its image path resolved; no file is touched. The
//! registry then materializes specs into [`MetaTemplate`]s through an
//! [`ImageLoader`], so the caller decides when I/O happens.

use serde::Serialize;
use serde_yml::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::color::Color;
use crate::document::{
    as_mapping, child, key_label, kind, require, require_bool, require_int, require_mapping,
    require_str,
};
use crate::error::{ConfigError, Result};
use crate::image::{ImageLoader, TemplateImage};
use crate::key::{slot_index_value, SlotIndex, SlotKey};
use crate::palette::Palette;

pub type TemplateName = String;

pub const DEFAULT_ALIGN: &str = "center";

/// Logo placement rectangle. Field order is top, bottom, left, right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogoRegion {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl LogoRegion {
    pub fn as_tuple(&self) -> (i64, i64, i64, i64) {
        (self.top, self.bottom, self.left, self.right)
    }
}

/// Alignment keywords. Authors may use any vocabulary; only the default is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoAlign {
    pub horizontal: String,
    pub vertical: String,
}

impl Default for LogoAlign {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_ALIGN.to_string(),
            vertical: DEFAULT_ALIGN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogoPlacement {
    pub region: LogoRegion,
    pub align: LogoAlign,
}

/// A validated template descriptor, not yet backed by pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTemplateSpec {
    pub name: TemplateName,
    pub path: PathBuf,
    pub color_map: BTreeMap<SlotKey, SlotIndex>,
    pub accept_logo: bool,
    pub placement: LogoPlacement,
}

impl MetaTemplateSpec {
    pub const SECTION: &'static str = "meta_templates";

    /// Validates one `meta_templates.<name>` descriptor and resolves its path.
    pub fn from_descriptor(name: &str, descriptor: &Value, root_dir: &Path) -> Result<Self> {
        let location = child(Self::SECTION, name);
        as_mapping(descriptor, &location)?;

        let path = root_dir.join(require_str(descriptor, "path", &location)?);

        let map_location = child(&location, "color_map");
        let mut color_map = BTreeMap::new();
        let mut labels = BTreeSet::new();
        for (raw_key, raw_slot) in require_mapping(descriptor, "color_map", &location)? {
            let entry_location = child(&map_location, &key_label(raw_key));
            let key = SlotKey::from_value(raw_key, &entry_location)?;
            let slot = slot_index_value(raw_slot, &entry_location)?;

            // `0` and `"0"` display and serialize as the same key
            if !labels.insert(key.to_string()) {
                return Err(ConfigError::shape(
                    entry_location,
                    "unique color_map key",
                    format!("duplicate key '{key}'"),
                ));
            }
            color_map.insert(key, slot);
        }

        let logo_location = child(&location, "logo");
        let logo = require(descriptor, "logo", &location)?;
        let accept_logo = require_bool(logo, "accept", &logo_location)?;

        let placement = if accept_logo {
            read_placement(logo, &logo_location)?
        } else {
            let logo_map = as_mapping(logo, &logo_location)?;
            if logo_map.contains_key("region") || logo_map.contains_key("align") {
                warn!(template = %name, "Ignoring logo region/align on a template that does not accept a logo");
            }
            LogoPlacement::default()
        };

        Ok(Self {
            name: name.to_string(),
            path,
            color_map,
            accept_logo,
            placement,
        })
    }
}

fn read_placement(logo: &Value, location: &str) -> Result<LogoPlacement> {
    let region_location = child(location, "region");
    let region = require(logo, "region", location)?;
    let region = LogoRegion {
        top: require_int(region, "top", &region_location)?,
        bottom: require_int(region, "bottom", &region_location)?,
        left: require_int(region, "left", &region_location)?,
        right: require_int(region, "right", &region_location)?,
    };

    let align_location = child(location, "align");
    let align = require(logo, "align", location)?;
    let align = LogoAlign {
        horizontal: require_str(align, "horizontal", &align_location)?.to_string(),
        vertical: require_str(align, "vertical", &align_location)?.to_string(),
    };

    Ok(LogoPlacement { region, align })
}

/// Describes every template in the `meta_templates` section. No I/O.
pub fn describe_section(section: &Value, root_dir: &Path) -> Result<Vec<MetaTemplateSpec>> {
    as_mapping(section, MetaTemplateSpec::SECTION)?
        .iter()
        .map(|(raw_name, descriptor)| {
            let name = raw_name.as_str().ok_or_else(|| {
                ConfigError::shape(
                    child(MetaTemplateSpec::SECTION, &key_label(raw_name)),
                    "template name string",
                    kind(raw_name),
                )
            })?;
            MetaTemplateSpec::from_descriptor(name, descriptor, root_dir)
        })
        .collect()
}

/// A template descriptor together with its decoded image.
#[derive(Debug, Clone)]
pub struct MetaTemplate {
    spec: MetaTemplateSpec,
    image: TemplateImage,
}

impl MetaTemplate {
    /// Acquires the image for `spec`.
    pub fn materialize(spec: MetaTemplateSpec, loader: &dyn ImageLoader) -> Result<Self> {
        let image = loader
            .load(&spec.path)
            .map_err(|source| ConfigError::ImageLoad {
                template: spec.name.clone(),
                path: spec.path.clone(),
                source,
            })?;
        Ok(Self { spec, image })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn path(&self) -> &Path {
        &self.spec.path
    }

    pub fn image(&self) -> &TemplateImage {
        &self.image
    }

    pub fn spec(&self) -> &MetaTemplateSpec {
        &self.spec
    }

    pub fn color_map(&self) -> &BTreeMap<SlotKey, SlotIndex> {
        &self.spec.color_map
    }

    pub fn accept_logo(&self) -> bool {
        self.spec.accept_logo
    }

    pub fn logo_region(&self) -> (i64, i64, i64, i64) {
        self.spec.placement.region.as_tuple()
    }

    pub fn logo_align_horizontal(&self) -> &str {
        &self.spec.placement.align.horizontal
    }

    pub fn logo_align_vertical(&self) -> &str {
        &self.spec.placement.align.vertical
    }

    /// Pairs each `color_map` key with the palette color at its slot index.
    pub fn resolve_colors(&self, palette: &Palette) -> Result<BTreeMap<SlotKey, Color>> {
        self.spec
            .color_map
            .iter()
            .map(|(key, slot)| {
                palette
                    .get(*slot)
                    .map(|color| (key.clone(), color))
                    .ok_or_else(|| {
                        ConfigError::missing(
                            child(&child(MetaTemplateSpec::SECTION, self.name()), "color_map"),
                            format!("palette slot {slot} for '{key}'"),
                        )
                    })
            })
            .collect()
    }
}

/// Meta template registry - materialized templates by name
#[derive(Debug, Clone, Default)]
pub struct MetaTemplateRegistry {
    templates: BTreeMap<TemplateName, MetaTemplate>,
}

impl MetaTemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every spec's image. The first failure aborts the whole batch;
    /// images decoded so far are dropped with it.
    pub fn materialize(specs: Vec<MetaTemplateSpec>, loader: &dyn ImageLoader) -> Result<Self> {
        let mut templates = BTreeMap::new();
        for spec in specs {
            let template = MetaTemplate::materialize(spec, loader)?;
            debug!(
                template = %template.name(),
                path = %template.path().display(),
                accept_logo = template.accept_logo(),
                "Loaded meta template"
            );
            templates.insert(template.name().to_string(), template);
        }
        Ok(Self { templates })
    }

    /// Describes and materializes the `meta_templates` section.
    pub fn from_section(section: &Value, root_dir: &Path, loader: &dyn ImageLoader) -> Result<Self> {
        Self::materialize(describe_section(section, root_dir)?, loader)
    }

    /// Replaces every template. On failure the registry keeps its previous contents.
    pub fn load(&mut self, section: &Value, root_dir: &Path, loader: &dyn ImageLoader) -> Result<()> {
        *self = Self::from_section(section, root_dir, loader)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MetaTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetaTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn register(&mut self, template: MetaTemplate) {
        self.templates.insert(template.name().to_string(), template);
    }
}
