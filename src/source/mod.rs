//! Country boundary sources.
//!
//! A [`GeometrySource`] resolves a country name to its land boundary. Lookups
//! never fail: an unknown name yields an empty geometry, which the grid
//! builder turns into an empty grid.

mod error;
mod geojson;
mod natural_earth;

use std::sync::Arc;

use geo::MultiPolygon;

pub use error::SourceError;
pub use natural_earth::{NaturalEarthSource, DEFAULT_NAME_PROPERTY};

/// CRS assumed when a dataset does not name one
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// A resolved country boundary with its coordinate reference system
#[derive(Debug, Clone)]
pub struct CountryGeometry {
    pub name: String,
    pub crs: String,
    pub geometry: Arc<MultiPolygon<f64>>,
}

impl CountryGeometry {
    /// Boundary for a name the source does not know
    pub fn empty(name: &str, crs: &str) -> Self {
        Self {
            name: name.to_string(),
            crs: crs.to_string(),
            geometry: Arc::new(MultiPolygon::new(vec![])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }
}

/// Lookup of country boundaries by dataset name.
pub trait GeometrySource: Send + Sync {
    fn resolve(&self, country_name: &str) -> CountryGeometry;
}
