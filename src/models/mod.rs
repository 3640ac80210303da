//! Core data models for the calibration grid.

pub mod cell;
pub mod country;

pub use cell::{Cell, Grid, LatLng};
pub use country::{CountryTable, DEFAULT_COUNTRY_NAME};
