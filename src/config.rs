use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::CountryTable;
use crate::source::DEFAULT_NAME_PROPERTY;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub defaults: RequestDefaults,
    /// Extra or overriding country code -> dataset name entries
    pub countries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5003".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub name_property: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dataset/naturalearth_lowres.geojson"),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

/// Values used when a calibrate request omits a field
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RequestDefaults {
    pub country: String,
    pub cell_size: f64,
    /// Upper bound on candidate cells tiled for one grid
    pub max_cells: usize,
}

/// Default `max_cells`: the whole globe at roughly 0.2 degree cells
pub const DEFAULT_MAX_CELLS: usize = 2_000_000;

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            cell_size: 1.0,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn country_table(&self) -> CountryTable {
        CountryTable::with_overrides(self.countries.iter().map(|(k, v)| (k, v.clone())))
    }
}
