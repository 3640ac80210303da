//! Error types for grid generation.

use thiserror::Error;

/// Grid generation errors.
///
/// An empty or unmatched geometry is not an error; it produces an empty grid.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    /// Cell size is zero, negative, NaN or infinite.
    #[error("Invalid cell size: {0} (must be a positive, finite number)")]
    InvalidCellSize(f64),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
