use crate::grid::GridConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_THROTTLE_MS: u64 = 120;
pub const DEFAULT_PLAYBACK_INTERVAL_MS: u64 = 700;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub dataset: Option<DatasetSection>,
    #[serde(default)]
    pub grid: Option<GridSection>,
    #[serde(default)]
    pub normalization: Option<NormalizationSection>,
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub playback: Option<PlaybackSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSection {
    /// Path to the venues GeoJSON FeatureCollection.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridSection {
    /// Target cell size in meters.
    pub cell_size_meters: Option<f64>,
    /// Legacy fallback for callers without meter semantics.
    pub cell_size_degrees: Option<f64>,
    /// Safety cap on rows * cols.
    pub max_cells: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NormalizationSection {
    /// Strategy name: "minmax", "fixed" or "quantile".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ignore_zeros: Option<bool>,
    /// Required for the "fixed" strategy: [domain_min, domain_max].
    pub domain: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
    /// Trailing-edge throttle window for view-driven recomputation (default: 120 ms)
    pub throttle_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackSection {
    /// Tick interval for the hour animation (default: 700 ms)
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl Config {
    pub fn dataset_path(&self) -> Option<&Path> {
        let path = self.dataset.as_ref()?.path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Returns the grid sizing parameters with defaults applied. A section
    /// that names either cell size wins wholesale, so a degrees-only config
    /// actually takes the legacy degree path.
    pub fn grid_config(&self) -> GridConfig {
        let mut grid = GridConfig::default();
        if let Some(section) = self.grid.as_ref() {
            if section.cell_size_meters.is_some() || section.cell_size_degrees.is_some() {
                grid.cell_size_meters = section.cell_size_meters;
                grid.cell_size_degrees = section.cell_size_degrees;
            }
            if let Some(max_cells) = section.max_cells {
                grid.max_cells = max_cells;
            }
        }
        grid
    }

    /// Returns the normalization section, or a default minmax one.
    pub fn normalization(&self) -> NormalizationSection {
        self.normalization
            .clone()
            .unwrap_or(NormalizationSection {
                kind: None,
                ignore_zeros: None,
                domain: None,
            })
    }

    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Returns the recompute throttle window as Duration (default: 120 ms)
    pub fn throttle_window(&self) -> Duration {
        let ms = self
            .server
            .as_ref()
            .and_then(|s| s.throttle_ms)
            .unwrap_or(DEFAULT_THROTTLE_MS);
        Duration::from_millis(ms)
    }

    /// Returns the playback tick interval in milliseconds (default: 700)
    pub fn playback_interval_ms(&self) -> u64 {
        self.playback
            .as_ref()
            .and_then(|p| p.interval_ms)
            .unwrap_or(DEFAULT_PLAYBACK_INTERVAL_MS)
    }
}
