//! Rendering of reports: console tables, HTML pages, charts and the
//! CSV/JSON/PDF artifacts written to the data directory.

pub mod chart;
pub mod export;
pub mod html;
pub mod pdf;
pub mod table;

use crate::config::OutputConfig;
use crate::frames::FrameError;
use crate::types::period::ObservationWindow;
use polars::error::PolarsError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to read '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed to serialize JSON file '{0}'")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Failed to render chart: {0}")]
    Chart(String),

    #[error("Chart rendering is disabled (build with the `charts` feature)")]
    ChartsDisabled,
}

/// Artifact formats offered for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("Unknown export format '{}'", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which chart a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Daily,
    MonthlyGdd,
}

impl ChartKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Daily => "daily_plot.svg",
            ChartKind::MonthlyGdd => "gdd_plot.svg",
        }
    }
}

/// Resolves artifact paths under the configured output directories.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl From<&OutputConfig> for OutputLayout {
    fn from(config: &OutputConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            static_dir: config.static_dir.clone(),
            upload_dir: config.upload_dir.clone(),
        }
    }
}

impl OutputLayout {
    /// `<data_dir>/weather_<station>_<key>.<ext>`.
    pub fn data_file(
        &self,
        station: &str,
        window: &ObservationWindow,
        format: ExportFormat,
    ) -> PathBuf {
        self.data_dir.join(format!(
            "weather_{}_{}.{}",
            station,
            window.file_key(),
            format.extension()
        ))
    }

    pub fn chart_file(&self, kind: ChartKind) -> PathBuf {
        self.static_dir.join(kind.file_name())
    }

    pub fn upload_file(&self, file_name: &str) -> PathBuf {
        self.upload_dir.join(file_name)
    }

    pub fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::DirCreation(dir.to_path_buf(), e))
    }
}
