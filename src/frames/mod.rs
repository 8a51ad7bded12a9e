//! Polars frame helpers: column names, typed column extraction, and
//! conversions between frames and the crate's row types.

pub mod convert;

use chrono::NaiveDate;
use polars::error::PolarsError;
use polars::prelude::*;
use thiserror::Error;

pub const COL_DATE: &str = "Date";
pub const COL_TIME: &str = "Heure";
pub const COL_TEMPERATURE: &str = "Température (°C)";
pub const COL_TEMPERATURE_MIN: &str = "Température min (°C)";
pub const COL_TEMPERATURE_MAX: &str = "Température max (°C)";
pub const COL_HUMIDITY: &str = "Humidité (%)";
pub const COL_PRECIPITATION: &str = "Précipitations (mm)";
pub const COL_GDD: &str = "GDD";
pub const COL_GDD_CUMULATIVE: &str = "GDD cumulés";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },
}

/// Retrieves a column by name from a DataFrame.
pub fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, FrameError> {
    df.column(col)
        .map_err(|e| FrameError::ColumnNotFound(col.to_string(), e))
}

/// Reads a column as optional floats.
///
/// Text columns are parsed, accepting a decimal comma (`4,5`); blank cells are
/// null.
pub fn float_values(df: &DataFrame, col: &str) -> Result<Vec<Option<f64>>, FrameError> {
    let column = get_column(df, col)?;
    if column.dtype() == &DataType::String {
        return column
            .str()?
            .into_iter()
            .map(|cell| parse_float_cell(col, cell))
            .collect();
    }
    let floats = column.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}

fn parse_float_cell(col: &str, cell: Option<&str>) -> Result<Option<f64>, FrameError> {
    let Some(text) = cell.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    text.replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| FrameError::InvalidValue {
            column: col.to_string(),
            value: text.to_string(),
        })
}

/// Reads a column as optional strings, casting non-text columns.
pub fn text_values(df: &DataFrame, col: &str) -> Result<Vec<Option<String>>, FrameError> {
    let column = get_column(df, col)?;
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect())
}

/// Reads a `YYYY-MM-DD` column. Every cell must hold a valid date.
///
/// Timestamps such as `2024-03-01T06:00:00` are accepted and truncated to
/// their date.
pub fn date_values(df: &DataFrame, col: &str) -> Result<Vec<NaiveDate>, FrameError> {
    text_values(df, col)?
        .into_iter()
        .map(|cell| {
            let text = cell.unwrap_or_default();
            let date_part = text.trim().split(['T', ' ']).next().unwrap_or_default();
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
                FrameError::InvalidValue {
                    column: col.to_string(),
                    value: text.clone(),
                }
            })
        })
        .collect()
}
