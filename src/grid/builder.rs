//! Bounding-box tiling and boundary filtering.

use geo::{BoundingRect, MultiPolygon, Rect};
use tracing::debug;

use super::error::{GridError, Result};
use super::index::CandidateIndex;
use crate::models::{Cell, Grid};

/// Builds calibration grids of a fixed cell size.
///
/// Holds no state besides the validated cell size: every call to
/// [`GridBuilder::build`] creates and drops its own candidate index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBuilder {
    cell_size: f64,
}

impl GridBuilder {
    /// Validate the cell size up front.
    pub fn new(cell_size: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        Ok(Self { cell_size })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cover `geometry` with square cells and keep those touching it.
    ///
    /// Cells are tiled from the bounding box minimum, X-major, and each cell's
    /// id is its position in that full tiling. Only cells intersecting the
    /// geometry are returned, sorted by id, so ids are usually sparse.
    pub fn build(&self, geometry: &MultiPolygon<f64>) -> Grid {
        let Some(bounds) = geometry.bounding_rect() else {
            debug!("Empty geometry, returning empty grid");
            return Grid::default();
        };

        let candidates = self.tile(&bounds);
        if candidates.is_empty() {
            debug!("Zero-area bounding box, returning empty grid");
            return Grid::default();
        }

        let index = CandidateIndex::build(candidates);
        let cells = index.intersecting(&bounds, geometry);

        debug!(
            "Grid at cell size {}: {} candidates, {} intersecting",
            self.cell_size,
            index.len(),
            cells.len()
        );

        Grid::new(cells)
    }

    /// Number of candidate cells `build` would tile for `geometry`.
    ///
    /// Allocates nothing, so callers can bound the work before building.
    /// Returns `None` when the count overflows `usize`.
    pub fn candidate_count(&self, geometry: &MultiPolygon<f64>) -> Option<usize> {
        let Some(bounds) = geometry.bounding_rect() else {
            return Some(0);
        };
        let nx = origin_count(bounds.min().x, bounds.max().x, self.cell_size);
        let ny = origin_count(bounds.min().y, bounds.max().y, self.cell_size);
        nx.checked_mul(ny)
    }

    /// Full candidate tiling of `bounds`, X-major.
    fn tile(&self, bounds: &Rect<f64>) -> Vec<Cell> {
        let xs = tiling_origins(bounds.min().x, bounds.max().x, self.cell_size);
        let ys = tiling_origins(bounds.min().y, bounds.max().y, self.cell_size);

        let mut cells = Vec::with_capacity(xs.len() * ys.len());
        for &x in &xs {
            for &y in &ys {
                let id = cells.len() as u64;
                cells.push(Cell::from_origin(id, x, y, self.cell_size));
            }
        }
        cells
    }
}

/// Origins `min, min + step, ...` strictly below `max`.
///
/// The count is `ceil((max - min) / step)` and each origin is computed from its
/// index rather than by accumulation, so the last cell may extend past `max`.
pub fn tiling_origins(min: f64, max: f64, step: f64) -> Vec<f64> {
    (0..origin_count(min, max, step))
        .map(|i| min + i as f64 * step)
        .collect()
}

/// `ceil((max - min) / step)`, saturating at `usize::MAX`
fn origin_count(min: f64, max: f64, step: f64) -> usize {
    if !(max > min) {
        return 0;
    }
    ((max - min) / step).ceil() as usize
}

/// Validate `cell_size` and build the grid for `geometry` in one call.
pub fn build_grid(geometry: &MultiPolygon<f64>, cell_size: f64) -> Result<Grid> {
    Ok(GridBuilder::new(cell_size)?.build(geometry))
}
