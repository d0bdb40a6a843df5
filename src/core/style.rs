/// Style catalog: preset name → visual description fragments.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::catalog::{data, CatalogError};

/// The three fragments a style preset contributes to every prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleBundle {
    pub global: String,
    pub lighting: String,
    pub lens: String,
}

/// Named style presets with a designated default.
///
/// Lookups never fail: an unknown preset name resolves to the default
/// bundle.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    presets: Vec<(String, StyleBundle)>,
    index: FxHashMap<String, usize>,
    default: usize,
}

#[derive(Debug, Deserialize)]
struct RonPreset {
    name: String,
    global: String,
    lighting: String,
    lens: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "StyleCatalog")]
struct RonStyleCatalog {
    default: String,
    presets: Vec<RonPreset>,
}

impl StyleCatalog {
    /// The catalog compiled into the library.
    pub fn builtin() -> Result<StyleCatalog, CatalogError> {
        Self::parse_ron(data::STYLES)
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<StyleCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<StyleCatalog, CatalogError> {
        let raw: RonStyleCatalog = ron::from_str(input)?;

        let mut presets = Vec::with_capacity(raw.presets.len());
        let mut index = FxHashMap::default();
        for preset in raw.presets {
            if index.contains_key(&preset.name) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate style preset '{}'",
                    preset.name
                )));
            }
            index.insert(preset.name.clone(), presets.len());
            presets.push((
                preset.name,
                StyleBundle {
                    global: preset.global,
                    lighting: preset.lighting,
                    lens: preset.lens,
                },
            ));
        }

        let default = *index.get(&raw.default).ok_or_else(|| {
            CatalogError::Invalid(format!("default style '{}' is not defined", raw.default))
        })?;

        Ok(StyleCatalog {
            presets,
            index,
            default,
        })
    }

    /// Bundle for `preset`, or the default bundle when the name is unknown.
    pub fn style_for(&self, preset: &str) -> &StyleBundle {
        let slot = self.index.get(preset).copied().unwrap_or(self.default);
        &self.presets[slot].1
    }

    pub fn contains(&self, preset: &str) -> bool {
        self.index.contains_key(preset)
    }

    pub fn default_name(&self) -> &str {
        &self.presets[self.default].0
    }

    /// Preset names in catalog order.
    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|(name, _)| name.as_str())
    }

    /// Merge another catalog into this one. Presets from `other` replace
    /// same-named presets here, new ones are appended, and `other`'s
    /// default wins.
    pub fn merge(&mut self, other: StyleCatalog) {
        let other_default = other.default_name().to_string();
        for (name, bundle) in other.presets {
            match self.index.get(&name) {
                Some(&slot) => self.presets[slot].1 = bundle,
                None => {
                    self.index.insert(name.clone(), self.presets.len());
                    self.presets.push((name, bundle));
                }
            }
        }
        if let Some(&slot) = self.index.get(&other_default) {
            self.default = slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = StyleCatalog::builtin().unwrap();
        assert_eq!(
            catalog.preset_names().collect::<Vec<_>>(),
            vec!["Cinematic 3D", "Clean Minimal", "Handcrafted Cozy", "Tech Explainer"]
        );
        assert_eq!(catalog.default_name(), "Cinematic 3D");
    }

    #[test]
    fn known_preset_lookup() {
        let catalog = StyleCatalog::builtin().unwrap();
        assert_eq!(catalog.style_for("Handcrafted Cozy").lens, "50mm, soft DOF");
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        let catalog = StyleCatalog::builtin().unwrap();
        assert!(!catalog.contains("NoSuchStyle"));
        assert_eq!(
            catalog.style_for("NoSuchStyle"),
            catalog.style_for("Cinematic 3D")
        );
        // lookups are exact
        assert_eq!(
            catalog.style_for("clean minimal"),
            catalog.style_for("Cinematic 3D")
        );
    }

    #[test]
    fn missing_default_is_rejected() {
        let src = r#"StyleCatalog(
            default: "Nope",
            presets: [(name: "A", global: "g", lighting: "l", lens: "x")],
        )"#;
        assert!(matches!(
            StyleCatalog::parse_ron(src),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn duplicate_preset_is_rejected() {
        let src = r#"StyleCatalog(
            default: "A",
            presets: [
                (name: "A", global: "g", lighting: "l", lens: "x"),
                (name: "A", global: "g2", lighting: "l2", lens: "x2"),
            ],
        )"#;
        assert!(StyleCatalog::parse_ron(src).is_err());
    }

    #[test]
    fn merge_precedence() {
        let mut base = StyleCatalog::builtin().unwrap();
        let extra = StyleCatalog::parse_ron(
            r#"StyleCatalog(
                default: "Neon Noir",
                presets: [
                    (name: "Neon Noir", global: "neon noir", lighting: "magenta rim", lens: "24mm"),
                    (name: "Clean Minimal", global: "flat", lighting: "flat", lens: "flat"),
                ],
            )"#,
        )
        .unwrap();
        base.merge(extra);

        assert_eq!(base.default_name(), "Neon Noir");
        assert_eq!(base.style_for("Clean Minimal").global, "flat");
        assert_eq!(base.style_for("unknown").global, "neon noir");
        assert_eq!(base.preset_names().count(), 5);
    }
}
