//! Calibrator - square sampling grids over country boundaries
//!
//! This library provides the grid builder, boundary sources and HTTP API shared
//! by the server and export binaries.

pub mod api;
pub mod config;
pub mod grid;
pub mod models;
pub mod source;

pub use grid::{build_grid, GridBuilder, GridError};
pub use models::{Cell, CountryTable, Grid, LatLng};
pub use source::{CountryGeometry, GeometrySource, NaturalEarthSource};
