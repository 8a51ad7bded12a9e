use crate::frames::convert::{cleaned_series_to_frame, degree_days_to_frame, frame_to_degree_days};
use crate::present::pdf::monthly_report_pdf;
use crate::present::{ExportError, ExportFormat, OutputLayout};
use crate::types::daily_aggregate::DegreeDay;
use crate::types::period::{Month, ObservationWindow};
use crate::types::report::{DailyReport, MonthlyReport};
use log::info;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const CSV_SEPARATOR: u8 = b';';

/// Paths of the artifacts written for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedArtifacts {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub pdf: Option<PathBuf>,
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => OutputLayout::ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Writes a `;` separated CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut file = File::create(path).map_err(|e| ExportError::Write(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(CSV_SEPARATOR)
        .finish(df)
        .map_err(|e| ExportError::CsvWrite(path.to_path_buf(), e))
}

/// Reads a `;` separated CSV with a header row.
pub fn read_csv(path: &Path) -> Result<DataFrame, ExportError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|options| options.with_separator(CSV_SEPARATOR))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| ExportError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| ExportError::CsvRead(path.to_path_buf(), e))
}

/// Writes `rows` as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(rows: &[T], path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| ExportError::Write(path.to_path_buf(), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)
        .map_err(|e| ExportError::Json(path.to_path_buf(), e))
}

/// Writes the daily CSV and JSON artifacts.
pub fn save_daily(layout: &OutputLayout, report: &DailyReport) -> Result<SavedArtifacts, ExportError> {
    let window = ObservationWindow::Day(report.date);
    let csv = layout.data_file(&report.station, &window, ExportFormat::Csv);
    let json = layout.data_file(&report.station, &window, ExportFormat::Json);

    write_csv(&mut cleaned_series_to_frame(&report.series)?, &csv)?;
    write_json(&report.series, &json)?;
    info!("Saved daily report for {} on {} to {:?}", report.station, report.date, csv);

    Ok(SavedArtifacts { csv, json, pdf: None })
}

/// Writes the monthly CSV, JSON and PDF artifacts.
pub fn save_monthly(
    layout: &OutputLayout,
    report: &MonthlyReport,
) -> Result<SavedArtifacts, ExportError> {
    let window = ObservationWindow::Month(report.month);
    let csv = layout.data_file(&report.station, &window, ExportFormat::Csv);
    let json = layout.data_file(&report.station, &window, ExportFormat::Json);

    write_csv(&mut degree_days_to_frame(&report.series)?, &csv)?;
    write_json(&report.series, &json)?;
    let pdf = write_monthly_pdf(layout, &report.station, report.month, &report.series)?;
    info!(
        "Saved monthly report for {} in {} to {:?}",
        report.station, report.month, csv
    );

    Ok(SavedArtifacts {
        csv,
        json,
        pdf: Some(pdf),
    })
}

/// Reads a monthly CSV written by [`save_monthly`] back into degree days.
pub fn read_monthly_csv(path: &Path) -> Result<Vec<DegreeDay>, ExportError> {
    let df = read_csv(path)?;
    Ok(frame_to_degree_days(&df)?)
}

pub fn write_monthly_pdf(
    layout: &OutputLayout,
    station: &str,
    month: Month,
    rows: &[DegreeDay],
) -> Result<PathBuf, ExportError> {
    let path = layout.data_file(station, &ObservationWindow::Month(month), ExportFormat::Pdf);
    ensure_parent(&path)?;
    let bytes = monthly_report_pdf(station, month, rows);
    std::fs::write(&path, bytes).map_err(|e| ExportError::Write(path.clone(), e))?;
    Ok(path)
}
