// Dashboard configuration (trident.toml).
//
// Every field has a default, so the file is optional and may set only the
// values that differ.

use crate::data::RadialMetric;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "trident.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub data: DataPaths,
    pub charts: ChartSettings,
    pub roster: RosterConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "2025 Trident Stats".to_string(),
            data: DataPaths::default(),
            charts: ChartSettings::default(),
            roster: RosterConfig::default(),
        }
    }
}

/// Location of the three input tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub aggression_file: String,
    pub power_file: String,
    pub radial_file: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            aggression_file: "quality_aggression.csv".to_string(),
            power_file: "power_vs_expected.csv".to_string(),
            radial_file: "hitter_radial_profile.csv".to_string(),
        }
    }
}

impl DataPaths {
    pub fn aggression(&self) -> PathBuf {
        self.dir.join(&self.aggression_file)
    }

    pub fn power(&self) -> PathBuf {
        self.dir.join(&self.power_file)
    }

    pub fn radial(&self) -> PathBuf {
        self.dir.join(&self.radial_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Players shown on the swing/whiff chart, by plate appearances.
    pub aggression_top_n: usize,
    /// Players shown on the power gap chart, by |xSLG - SLG|.
    pub power_gap_top_n: usize,
    pub kde_points: usize,
    /// Fixed KDE bandwidth; Silverman's rule when absent.
    pub kde_bandwidth: Option<f64>,
    pub density_metric: RadialMetric,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            aggression_top_n: 40,
            power_gap_top_n: 30,
            kde_points: crate::stats::DEFAULT_POINTS,
            kde_bandwidth: None,
            density_metric: RadialMetric::LaunchSpeed,
        }
    }
}

/// Players offered in the profile selector. Empty means every player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub players: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let players = [
            "Arozarena, Randy",
            "Raleigh, Cal",
            "Crawford, J.P.",
            "Rodríguez, Julio",
            "Polanco, Jorge",
            "Williamson, Ben",
            "Garver, Mitch",
            "Canzone, Dominic",
            "Suárez, Eugenio",
            "Young, Cole",
            "Naylor, Josh",
            "Moore, Dylan",
            "Raley, Luke",
            "Tellez, Rowdy",
            "Solano, Donovan",
            "Mastrobuoni, Miles",
            "Rivas, Leo",
            "Robles, Victor",
            "Taveras, Leody",
        ];
        Self {
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(text).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("charts.aggression_top_n", self.charts.aggression_top_n),
            ("charts.power_gap_top_n", self.charts.power_gap_top_n),
            ("charts.kde_points", self.charts.kde_points),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        if let Some(h) = self.charts.kde_bandwidth {
            if !(h.is_finite() && h > 0.0) {
                return Err(ConfigError::ValidationError {
                    field: "charts.kde_bandwidth".to_string(),
                    message: format!("must be a positive number, got {h}"),
                });
            }
        }

        Ok(())
    }
}

/// Load the dashboard config.
///
/// An explicit `path` must exist. Without one, `trident.toml` in the working
/// directory is used when present, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let path = match path {
        Some(p) if !p.is_file() => {
            return Err(ConfigError::FileNotFound {
                path: p.to_path_buf(),
            })
        }
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                info!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(DashboardConfig::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    let config = DashboardConfig::from_toml_str(&text, &path)?;
    info!("config loaded from {}", path.display());
    Ok(config)
}
