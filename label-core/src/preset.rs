//! Named canvas size presets.
//!
//! Presets come from a JSON file shaped like:
//!
//! ```json
//! { "dimensions": [ { "name": "Shelf", "width": 400, "height": 200 },
//!                   { "name": "Strip", "width": "auto", "height": 120 } ] }
//! ```
//!
//! A missing or malformed source never fails: the catalog falls back to a
//! single caller-supplied preset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasSpec, CanvasWidth};
use crate::error::{LabelError, LabelResult};

/// A named canvas size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasPreset {
    /// Display name.
    pub name: String,
    /// Width, possibly `auto`.
    pub width: CanvasWidth,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasPreset {
    /// Create a preset.
    #[must_use]
    pub fn new(name: impl Into<String>, width: CanvasWidth, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// The stock fallback, `Default` at 400x200.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new("Default", CanvasWidth::Fixed(400), 200)
    }

    /// Canvas described by this preset.
    #[must_use]
    pub fn canvas(&self) -> CanvasSpec {
        CanvasSpec {
            width: self.width,
            height: self.height,
        }
    }

    /// Label shown in selection lists, e.g. `Shelf (400x200)`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({}x{})", self.name, self.width, self.height)
    }
}

/// File layout of a preset source.
#[derive(Debug, Deserialize)]
struct PresetFile {
    #[serde(default)]
    dimensions: Vec<CanvasPreset>,
}

/// Ordered list of presets with a fallback for unknown selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    presets: Vec<CanvasPreset>,
    fallback: CanvasPreset,
}

impl PresetCatalog {
    /// Catalog containing only `fallback`.
    #[must_use]
    pub fn fallback_only(fallback: CanvasPreset) -> Self {
        Self {
            presets: vec![fallback.clone()],
            fallback,
        }
    }

    /// Parse presets from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or lists no presets.
    pub fn from_json_str(json: &str, fallback: CanvasPreset) -> LabelResult<Self> {
        let file: PresetFile = serde_json::from_str(json)?;
        if file.dimensions.is_empty() {
            return Err(LabelError::Config("no presets defined".to_string()));
        }
        Ok(Self {
            presets: file.dimensions,
            fallback,
        })
    }

    /// Read presets from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(path: &Path, fallback: CanvasPreset) -> LabelResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json, fallback)
    }

    /// Read presets from `path`, falling back to `fallback` on any error.
    #[must_use]
    pub fn load(path: &Path, fallback: CanvasPreset) -> Self {
        match Self::try_load(path, fallback.clone()) {
            Ok(catalog) => {
                tracing::debug!(path = %path.display(), count = catalog.len(), "Loaded presets");
                catalog
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Error loading presets, using default: {e}");
                Self::fallback_only(fallback)
            }
        }
    }

    /// All presets in file order.
    #[must_use]
    pub fn presets(&self) -> &[CanvasPreset] {
        &self.presets
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog is empty (never true for a loaded catalog).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Preset at `index`, or the fallback when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &CanvasPreset {
        self.presets.get(index).unwrap_or(&self.fallback)
    }

    /// Preset named `name` (case-insensitive), or the fallback.
    #[must_use]
    pub fn select(&self, name: &str) -> &CanvasPreset {
        self.find(name).unwrap_or_else(|| {
            tracing::warn!(preset = name, "Unknown preset, using {}", self.fallback.name);
            &self.fallback
        })
    }

    /// Preset named `name` (case-insensitive), if present.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CanvasPreset> {
        self.presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }

    /// The fallback preset.
    #[must_use]
    pub fn fallback(&self) -> &CanvasPreset {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &str = r#"{
        "dimensions": [
            { "name": "Shelf", "width": 400, "height": 200 },
            { "name": "Strip", "width": "auto", "height": 120 },
            { "name": "Broken", "width": "wide", "height": 80 }
        ]
    }"#;

    #[test]
    fn test_parse_presets() {
        let catalog = PresetCatalog::from_json_str(PRESETS, CanvasPreset::fallback()).expect("parse");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).width, CanvasWidth::Auto);
        assert_eq!(catalog.get(2).width, CanvasWidth::Fixed(0));
    }

    #[test]
    fn test_display_labels() {
        let catalog = PresetCatalog::from_json_str(PRESETS, CanvasPreset::fallback()).expect("parse");
        assert_eq!(catalog.get(0).display_label(), "Shelf (400x200)");
        assert_eq!(catalog.get(1).display_label(), "Strip (autox120)");
    }

    #[test]
    fn test_select_unknown_uses_fallback() {
        let catalog = PresetCatalog::from_json_str(PRESETS, CanvasPreset::fallback()).expect("parse");
        assert_eq!(catalog.select("strip").name, "Strip");
        assert_eq!(catalog.select("Poster").name, "Default");
        assert_eq!(catalog.get(99).name, "Default");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = PresetCatalog::from_json_str("{ dimensions: ", CanvasPreset::fallback());
        assert!(matches!(result, Err(LabelError::Serialization(_))));
    }

    #[test]
    fn test_missing_dimensions_is_an_error() {
        let result = PresetCatalog::from_json_str("{}", CanvasPreset::fallback());
        assert!(matches!(result, Err(LabelError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let custom = CanvasPreset::new("Badge", CanvasWidth::Fixed(300), 100);
        let catalog = PresetCatalog::load(&dir.path().join("nope.json"), custom.clone());
        assert_eq!(catalog.presets(), [custom]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dimensions.json");
        std::fs::write(&path, PRESETS).expect("write");
        let catalog = PresetCatalog::load(&path, CanvasPreset::fallback());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).canvas(), CanvasSpec::fixed(400, 200));
    }
}
