//! Calibration grid generation.
//!
//! Tiles a boundary's bounding box into square cells, prunes the candidates
//! with an R-tree and keeps the cells that intersect the boundary itself.

mod builder;
mod error;
mod index;

pub use builder::{build_grid, tiling_origins, GridBuilder};
pub use error::{GridError, Result};
pub use index::{CandidateIndex, IndexedCell};
