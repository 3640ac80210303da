//! Minimal GeoJSON reader for country boundary datasets.
//!
//! Only the parts a country dataset needs are modelled: a `FeatureCollection`
//! of `Polygon`/`MultiPolygon` features with a properties object and the
//! optional legacy `crs` member.

use geo_types::{Coord, LineString, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub crs: Option<NamedCrs>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedCrs {
    pub properties: NamedCrsProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedCrsProperties {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

impl Feature {
    /// First string property found among `keys`
    pub fn name<'a>(&'a self, keys: &[&str]) -> Option<&'a str> {
        let props = self.properties.as_ref()?;
        keys.iter().find_map(|k| props.get(*k).and_then(Value::as_str))
    }
}

/// Positions are kept as `Vec<f64>` so 3D coordinates still parse.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum RawGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

impl RawGeometry {
    /// Convert to polygons, or `None` for non-areal geometry types
    pub fn into_polygons(self) -> Option<Vec<Polygon<f64>>> {
        match self {
            RawGeometry::Polygon { coordinates } => {
                Some(polygon(&coordinates).into_iter().collect())
            }
            RawGeometry::MultiPolygon { coordinates } => {
                Some(coordinates.iter().filter_map(|p| polygon(p)).collect())
            }
            RawGeometry::Unsupported => None,
        }
    }
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter();
    let exterior = ring(rings.next()?)?;
    let interiors = rings.filter_map(|r| ring(r)).collect();
    Some(Polygon::new(exterior, interiors))
}

/// Build a closed ring, dropping malformed positions
fn ring(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect();

    if coords.len() < 3 {
        return None;
    }

    // Close the ring if needed
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }

    if coords.len() < 4 {
        return None;
    }

    Some(LineString::new(coords))
}
