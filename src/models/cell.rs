//! Grid cell value types.

use geo::Rect;
use serde::{Deserialize, Serialize};

/// Geographic corner of a cell. `lat` is the Y axis, `lng` the X axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A square tile of the calibration grid.
///
/// `id` is the cell's position in the full tiling enumeration, so ids within
/// one grid are unique but usually not contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "temp_id")]
    pub id: u64,
    pub cell_size: f64,
    #[serde(rename = "top_right_coords")]
    pub top_right: LatLng,
    #[serde(rename = "bottom_left_coords")]
    pub bottom_left: LatLng,
}

impl Cell {
    /// Build a cell from its tiling origin (x = lng, y = lat).
    pub fn from_origin(id: u64, x: f64, y: f64, cell_size: f64) -> Self {
        Self {
            id,
            cell_size,
            top_right: LatLng::new(y + cell_size, x + cell_size),
            bottom_left: LatLng::new(y, x),
        }
    }

    /// Cell bounds in raw X/Y space
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            (self.bottom_left.lng, self.bottom_left.lat),
            (self.top_right.lng, self.top_right.lat),
        )
    }
}

/// The ordered set of cells produced for one (geometry, cell size) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    /// Wrap cells, ordering them by id.
    pub fn new(mut cells: Vec<Cell>) -> Self {
        cells.sort_by_key(|c| c.id);
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}
