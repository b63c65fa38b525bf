//! District boundaries read from a GeoJSON feature collection.

use std::fs;
use std::path::Path;

use geojson::{Feature, GeoJson};

use super::source::Value;
use crate::error::{InsightsError, Result};

/// Property that names districts in geoBoundaries ADM2 files.
pub const DEFAULT_REGION_KEY: &str = "shapeName";

/// A named district boundary.
#[derive(Debug, Clone)]
pub struct Region {
    /// Value of the key property, used to join against dataset districts.
    pub name: String,
    /// The original feature, geometry and properties intact.
    pub feature: Feature,
}

/// Ordered set of regions keyed by one feature property.
#[derive(Debug, Clone)]
pub struct RegionCollection {
    /// Property key the names were read from.
    pub key: String,
    pub regions: Vec<Region>,
}

impl RegionCollection {
    /// Parse a GeoJSON document, naming each region by `key`.
    ///
    /// Features without the key (or with a non-scalar value under it) are
    /// skipped. A bare `Feature` document yields a one-region collection.
    pub fn from_geojson_str(text: &str, key: &str) -> Result<Self> {
        let geojson: GeoJson = text.parse()?;
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(InsightsError::UnsupportedFormat(
                    "bare geometry has no region names".to_string(),
                ));
            }
        };

        let mut regions = Vec::with_capacity(features.len());
        for (idx, feature) in features.into_iter().enumerate() {
            let Some(name) = feature.property(key).and_then(region_name) else {
                log::warn!("Feature {idx} has no '{key}' property, skipping");
                continue;
            };
            regions.push(Region { name, feature });
        }

        Ok(Self {
            key: key.to_string(),
            regions,
        })
    }

    /// Read and parse a GeoJSON file.
    pub fn from_path(path: impl AsRef<Path>, key: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| InsightsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_geojson_str(&text, key)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Find a region by exact name.
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }
}

/// Region name from a scalar property, spelled the way dataset cells are
/// (`7.0` reads as `7`).
fn region_name(property: &serde_json::Value) -> Option<String> {
    match property {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => n.as_f64().and_then(|f| Value::Number(f).as_text()),
        _ => None,
    }
}

/// Load region boundaries, returning `None` when the map is unavailable.
pub fn load_regions(path: impl AsRef<Path>, key: &str) -> Option<RegionCollection> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("Region file '{}' was not found", path.display());
        return None;
    }

    match RegionCollection::from_path(path, key) {
        Ok(regions) => {
            log::info!("Loaded {} regions from '{}'", regions.len(), path.display());
            Some(regions)
        }
        Err(e) => {
            log::warn!("Error loading region file '{}': {}", path.display(), e);
            None
        }
    }
}
