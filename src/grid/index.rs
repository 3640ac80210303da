//! R-tree over candidate cells for coarse overlap queries.

use geo::{Intersects, MultiPolygon, Rect};
use rstar::{RTree, RTreeObject, AABB};

use crate::models::Cell;

/// Wrapper for R-tree indexing of candidate cells
#[derive(Debug, Clone)]
pub struct IndexedCell {
    pub cell: Cell,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedCell {
    pub fn new(cell: Cell) -> Self {
        let envelope = rect_envelope(&cell.rect());
        Self { cell, envelope }
    }
}

fn rect_envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// Spatial index over the full candidate tiling of one grid run
pub struct CandidateIndex {
    tree: RTree<IndexedCell>,
}

impl CandidateIndex {
    /// Bulk load the candidate cells
    pub fn build(cells: Vec<Cell>) -> Self {
        let indexed: Vec<IndexedCell> = cells.into_iter().map(IndexedCell::new).collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Candidates whose bounds overlap `bounds` (edges touching included)
    pub fn locate_in_bounds(&self, bounds: &Rect<f64>) -> impl Iterator<Item = &IndexedCell> {
        self.tree
            .locate_in_envelope_intersecting(&rect_envelope(bounds))
    }

    /// Cells that actually intersect `geometry`.
    ///
    /// The R-tree prunes to candidates overlapping `bounds` first, so the exact
    /// polygon test only runs on that subset. Result order follows the tree and
    /// is not meaningful.
    pub fn intersecting(&self, bounds: &Rect<f64>, geometry: &MultiPolygon<f64>) -> Vec<Cell> {
        self.locate_in_bounds(bounds)
            .filter(|ic| geometry.intersects(&ic.cell.rect().to_polygon()))
            .map(|ic| ic.cell.clone())
            .collect()
    }

    /// Get total number of indexed candidates
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
