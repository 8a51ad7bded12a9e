//! TOML configuration with a default for every field.
//!
//! Resolution order: an explicit path, then `$SYNOP_CONFIG`, then `synop.toml`
//! in the working directory, then built-in defaults.

use crate::types::station_match::StationMatch;
use chrono::NaiveTime;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "SYNOP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "synop.toml";

pub const DEFAULT_BASE_URL: &str = "https://data.opendatasoft.com/api/explore/v2.1/catalog/datasets/donnees-synop-essentielles-omm@public/records";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse configuration file '{0}'")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("Invalid synoptic hour '{0}', expected HH:MM")]
    InvalidSynopticHour(String, #[source] chrono::ParseError),

    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynopConfig {
    pub api: ApiConfig,
    pub pipeline: PipelineOptions,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Records endpoint and paging limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: usize,
    /// Safety cap on the number of pages requested per query.
    pub max_pages: usize,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 100,
            max_pages: 100,
            timeout_secs: 25,
        }
    }
}

/// Knobs of the cleaning and degree-day pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Floor times to 3 hour boundaries and keep only `synoptic_hours`.
    pub bucket_to_3h: bool,
    pub interpolate: bool,
    pub station_match: StationMatch,
    /// `HH:MM` times kept when bucketing.
    pub synoptic_hours: Vec<String>,
    pub base_temperature: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            bucket_to_3h: true,
            interpolate: true,
            station_match: StationMatch::default(),
            synoptic_hours: [
                "00:00", "03:00", "06:00", "09:00", "12:00", "15:00", "18:00", "21:00", "22:00",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            base_temperature: 10.0,
        }
    }
}

impl PipelineOptions {
    /// Parsed `synoptic_hours`. Entries that do not parse are skipped; they
    /// are rejected when loading a configuration file.
    pub fn synoptic_times(&self) -> Vec<NaiveTime> {
        self.synoptic_hours
            .iter()
            .filter_map(|h| NaiveTime::parse_from_str(h.trim(), "%H:%M").ok())
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for hour in &self.synoptic_hours {
            NaiveTime::parse_from_str(hour.trim(), "%H:%M")
                .map_err(|e| ConfigError::InvalidSynopticHour(hour.clone(), e))?;
        }
        if !self.base_temperature.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.base_temperature",
                message: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

/// Where artifacts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub log_to_stdout: bool,
    pub log_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            log_to_stdout: true,
            log_path: None,
        }
    }
}

impl SynopConfig {
    /// Loads the configuration, see the module docs for the lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: SynopConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.api.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.max_pages",
                message: "must be at least 1".to_string(),
            });
        }
        self.pipeline.validate()
    }
}
