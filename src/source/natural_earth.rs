//! Country boundaries from a Natural Earth style GeoJSON dataset.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use geo::{MultiPolygon, Polygon};
use hashbrown::HashMap;
use tracing::{debug, info};

use super::geojson::FeatureCollection;
use super::{CountryGeometry, GeometrySource, SourceError, DEFAULT_CRS};

/// Property holding the country name in Natural Earth admin-0 files
pub const DEFAULT_NAME_PROPERTY: &str = "name";

/// Tried in order when the configured name property is missing
const FALLBACK_NAME_PROPERTIES: &[&str] = &["NAME", "ADMIN"];

/// In-memory country boundaries keyed by exact dataset name.
///
/// Features sharing a name are merged into one multipolygon.
pub struct NaturalEarthSource {
    countries: HashMap<String, Arc<MultiPolygon<f64>>>,
    crs: String,
}

impl NaturalEarthSource {
    /// Load a GeoJSON `FeatureCollection` from disk
    pub fn load<P: AsRef<Path>>(path: P, name_property: &str) -> Result<Self, SourceError> {
        let path = path.as_ref();
        info!("Loading country boundaries from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collection: FeatureCollection =
            serde_json::from_str(&content).map_err(|source| SourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let source = Self::from_collection(collection, name_property);
        info!(
            "Loaded {} country boundaries ({})",
            source.len(),
            source.crs
        );
        Ok(source)
    }

    /// Parse a GeoJSON `FeatureCollection` held in memory
    pub fn from_geojson_str(geojson: &str, name_property: &str) -> Result<Self, SourceError> {
        let collection: FeatureCollection = serde_json::from_str(geojson)?;
        Ok(Self::from_collection(collection, name_property))
    }

    fn from_collection(collection: FeatureCollection, name_property: &str) -> Self {
        let crs = collection
            .crs
            .map(|c| c.properties.name)
            .unwrap_or_else(|| DEFAULT_CRS.to_string());

        let mut keys = vec![name_property];
        keys.extend(
            FALLBACK_NAME_PROPERTIES
                .iter()
                .copied()
                .filter(|k| *k != name_property),
        );

        let mut merged: HashMap<String, Vec<Polygon<f64>>> = HashMap::new();
        let mut skipped = 0usize;

        for feature in collection.features {
            let Some(name) = feature.name(&keys).map(str::to_string) else {
                skipped += 1;
                continue;
            };

            let polygons = match feature.geometry.and_then(|g| g.into_polygons()) {
                Some(polygons) if !polygons.is_empty() => polygons,
                _ => {
                    debug!("Skipping feature '{}' without areal geometry", name);
                    skipped += 1;
                    continue;
                }
            };

            merged.entry(name).or_default().extend(polygons);
        }

        if skipped > 0 {
            debug!("Skipped {} features without a name or polygon", skipped);
        }

        let countries = merged
            .into_iter()
            .map(|(name, polygons)| (name, Arc::new(MultiPolygon::new(polygons))))
            .collect();

        Self { countries, crs }
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    /// Get number of distinct country names
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn contains(&self, country_name: &str) -> bool {
        self.countries.contains_key(country_name)
    }
}

impl GeometrySource for NaturalEarthSource {
    fn resolve(&self, country_name: &str) -> CountryGeometry {
        match self.countries.get(country_name) {
            Some(geometry) => CountryGeometry {
                name: country_name.to_string(),
                crs: self.crs.clone(),
                geometry: Arc::clone(geometry),
            },
            None => {
                debug!("No boundary for country '{}'", country_name);
                CountryGeometry::empty(country_name, &self.crs)
            }
        }
    }
}
