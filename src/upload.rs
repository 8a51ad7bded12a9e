//! Parsing of user-supplied daily tables (CSV or JSON).

use crate::frames::convert::frame_to_aggregates;
use crate::frames::{FrameError, COL_DATE, COL_HUMIDITY, COL_TEMPERATURE_MAX, COL_TEMPERATURE_MIN};
use crate::types::daily_aggregate::DailyAggregate;
use log::{info, warn};
use polars::error::PolarsError;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source column names and the report column they become, applied in order.
/// A rename is skipped when the target column already exists.
const COLUMN_RENAMES: [(&str, &str); 6] = [
    ("date", COL_DATE),
    ("tn12", COL_TEMPERATURE_MIN),
    ("tn", COL_TEMPERATURE_MIN),
    ("tx12", COL_TEMPERATURE_MAX),
    ("tx", COL_TEMPERATURE_MAX),
    ("u", COL_HUMIDITY),
];

const REQUIRED_COLUMNS: [&str; 4] = [COL_DATE, COL_TEMPERATURE_MIN, COL_TEMPERATURE_MAX, COL_HUMIDITY];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Aucun fichier sélectionné.")]
    NoFile,

    #[error("Fichier invalide.")]
    EmptyFileName,

    #[error("Format non supporté. Veuillez uploader un fichier CSV ou JSON.")]
    UnsupportedFormat(String),

    #[error("Colonnes manquantes après renommage. Présentes : {}", format_set(.present))]
    MissingColumns {
        present: BTreeSet<String>,
        missing: BTreeSet<String>,
    },

    #[error("Erreur lors de l'enregistrement du fichier '{0}'")]
    Store(PathBuf, #[source] std::io::Error),

    #[error("Erreur lors de la lecture du fichier : {source}")]
    Read {
        file: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Erreur lors de la lecture du fichier : {0}")]
    Frame(#[from] FrameError),
}

impl UploadError {
    /// Whether the upload itself was at fault, as opposed to reading it.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UploadError::NoFile
                | UploadError::EmptyFileName
                | UploadError::UnsupportedFormat(_)
                | UploadError::MissingColumns { .. }
        )
    }
}

fn format_set(set: &BTreeSet<String>) -> String {
    let items: Vec<String> = set.iter().map(|c| format!("'{}'", c)).collect();
    format!("{{{}}}", items.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Json,
}

impl UploadFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_file_name(file_name: &str) -> Result<Self, UploadError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(UploadFormat::Csv),
            "json" => Ok(UploadFormat::Json),
            _ => Err(UploadError::UnsupportedFormat(extension)),
        }
    }
}

/// Rows of an accepted upload and the columns the file ended up with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedDataset {
    pub columns: Vec<String>,
    pub rows: Vec<DailyAggregate>,
}

/// Saves an uploaded file into `upload_dir` and parses it.
///
/// Only the final component of `file_name` is used for the stored file.
pub fn store_and_parse(
    upload_dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<UploadedDataset, UploadError> {
    let file_name = Path::new(file_name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or(UploadError::EmptyFileName)?;
    let format = UploadFormat::from_file_name(file_name)?;

    std::fs::create_dir_all(upload_dir)
        .map_err(|e| UploadError::Store(upload_dir.to_path_buf(), e))?;
    let path = upload_dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|e| UploadError::Store(path.clone(), e))?;
    info!("Stored upload {:?} ({} bytes)", path, bytes.len());

    parse_file(&path, format)
}

/// Reads a stored upload, renames known columns and validates the schema.
pub fn parse_file(path: &Path, format: UploadFormat) -> Result<UploadedDataset, UploadError> {
    let read_error = |source| UploadError::Read {
        file: path.to_path_buf(),
        source,
    };
    let mut df = match format {
        UploadFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|options| options.with_separator(b';'))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(read_error)?
            .finish()
            .map_err(read_error)?,
        UploadFormat::Json => {
            let file = File::open(path).map_err(|e| UploadError::Store(path.to_path_buf(), e))?;
            JsonReader::new(file).finish().map_err(read_error)?
        }
    };

    rename_known_columns(&mut df).map_err(read_error)?;

    let present: BTreeSet<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let missing: BTreeSet<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(**required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        warn!("Rejected upload {:?}, missing columns {:?}", path, missing);
        return Err(UploadError::MissingColumns { present, missing });
    }

    let rows = frame_to_aggregates(&df)?;
    Ok(UploadedDataset {
        columns: present.into_iter().collect(),
        rows,
    })
}

fn rename_known_columns(df: &mut DataFrame) -> Result<(), PolarsError> {
    for (source, target) in COLUMN_RENAMES {
        let names = df.get_column_names_str();
        if names.contains(&source) && !names.contains(&target) {
            df.rename(source, target.into())?;
        }
    }
    Ok(())
}
