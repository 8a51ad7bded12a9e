use crate::error::SynopError;
use crate::fetcher::PageSource;
use crate::present::chart::{write_daily_chart, write_gdd_chart};
use crate::present::export::{read_monthly_csv, save_daily, save_monthly, write_monthly_pdf};
use crate::present::html::{daily_page, monthly_page, DailyForm, MonthlyForm};
use crate::present::{ChartKind, ExportError, ExportFormat, OutputLayout};
use crate::types::period::{parse_date, Month, ObservationWindow};
use crate::types::report::{DailyReport, MonthlyReport};
use crate::upload::{store_and_parse, UploadError};
use crate::web::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

const FILE_NOT_FOUND: &str = "Fichier non trouvé";
const CSV_NOT_FOUND: &str = "CSV introuvable pour générer le PDF";
const MISSING_STATION: &str = "Veuillez indiquer une station.";
const INVALID_STATION: &str = "Nom de station invalide.";
const INVALID_PERIOD: &str = "Année ou mois invalide.";
const SAVE_FAILED: &str = "Erreur lors de l'enregistrement des fichiers.";
const PROCESSING_FAILED: &str = "Erreur lors du traitement des données.";
const UPLOAD_SUCCESS: &str = "Fichier chargé avec succès.";

#[derive(Debug, Deserialize)]
pub(super) struct MonthlyInput {
    #[serde(default)]
    station: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    month: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DailyInput {
    #[serde(default)]
    station: String,
    #[serde(default)]
    date: String,
}

fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

fn text(status: StatusCode, message: &'static str) -> Response {
    (status, message).into_response()
}

/// Station names and other path segments may only hold letters, digits,
/// spaces and `-_'`, and may not start with a dot.
fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && !component.starts_with('.')
        && component
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '\''))
}

pub(super) async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub(super) async fn monthly_form() -> Html<String> {
    Html(monthly_page(&MonthlyForm::default(), None, None))
}

pub(super) async fn monthly_submit<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    Form(input): Form<MonthlyInput>,
) -> Response {
    let form = MonthlyForm {
        station: input.station.trim().to_uppercase(),
        year: input.year.trim().to_string(),
        month: input.month.trim().to_string(),
    };
    if form.station.is_empty() {
        return page(
            StatusCode::BAD_REQUEST,
            monthly_page(&form, None, Some(MISSING_STATION)),
        );
    }
    if !is_safe_component(&form.station) {
        return page(
            StatusCode::BAD_REQUEST,
            monthly_page(&form, None, Some(INVALID_STATION)),
        );
    }
    let (Ok(year), Ok(month)) = (form.year.parse::<i32>(), form.month.parse::<u32>()) else {
        return page(
            StatusCode::BAD_REQUEST,
            monthly_page(&form, None, Some(INVALID_PERIOD)),
        );
    };

    let report = match state
        .synop
        .monthly()
        .station(&form.station)
        .year(year)
        .month(month)
        .call()
        .await
    {
        Ok(report) => report,
        Err(SynopError::InvalidMonth { .. }) => {
            return page(
                StatusCode::BAD_REQUEST,
                monthly_page(&form, None, Some(INVALID_PERIOD)),
            );
        }
        Err(e) => {
            error!("Monthly report for '{}' failed: {}", form.station, e);
            return page(
                StatusCode::INTERNAL_SERVER_ERROR,
                monthly_page(&form, None, Some(PROCESSING_FAILED)),
            );
        }
    };

    if let Some(message) = report.status().message() {
        return page(StatusCode::OK, monthly_page(&form, None, Some(message)));
    }

    let error = persist_monthly(state.layout.clone(), report.clone()).await;
    let banner = error.or(report.warning());
    page(StatusCode::OK, monthly_page(&form, Some(&report), banner))
}

async fn persist_monthly(layout: OutputLayout, report: MonthlyReport) -> Option<&'static str> {
    let saved = tokio::task::spawn_blocking(move || -> Result<(), ExportError> {
        save_monthly(&layout, &report)?;
        let chart = layout.chart_file(ChartKind::MonthlyGdd);
        skip_disabled_chart(write_gdd_chart(&report.station, &report.series, &chart))
    })
    .await;
    report_persist_failure(saved)
}

pub(super) async fn daily_form() -> Html<String> {
    Html(daily_page(&DailyForm::default(), None, None))
}

pub(super) async fn daily_submit<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    Form(input): Form<DailyInput>,
) -> Response {
    let form = DailyForm {
        station: input.station.trim().to_uppercase(),
        date: input.date.trim().to_string(),
    };
    if form.station.is_empty() {
        return page(
            StatusCode::BAD_REQUEST,
            daily_page(&form, None, Some(MISSING_STATION)),
        );
    }
    if !is_safe_component(&form.station) {
        return page(
            StatusCode::BAD_REQUEST,
            daily_page(&form, None, Some(INVALID_STATION)),
        );
    }
    let date = match parse_date(&form.date) {
        Ok(date) => date,
        Err(e) => {
            return page(
                StatusCode::BAD_REQUEST,
                daily_page(&form, None, Some(&e.to_string())),
            );
        }
    };

    let report = state
        .synop
        .daily()
        .station(&form.station)
        .date(date)
        .call()
        .await;

    if let Some(message) = report.status().message() {
        return page(StatusCode::OK, daily_page(&form, None, Some(message)));
    }

    let error = persist_daily(state.layout.clone(), report.clone()).await;
    let banner = error.or(report.warning());
    page(StatusCode::OK, daily_page(&form, Some(&report), banner))
}

async fn persist_daily(layout: OutputLayout, report: DailyReport) -> Option<&'static str> {
    let saved = tokio::task::spawn_blocking(move || -> Result<(), ExportError> {
        save_daily(&layout, &report)?;
        skip_disabled_chart(write_daily_chart(
            &report,
            &layout.chart_file(ChartKind::Daily),
        ))
    })
    .await;
    report_persist_failure(saved)
}

fn skip_disabled_chart(result: Result<(), ExportError>) -> Result<(), ExportError> {
    match result {
        Err(ExportError::ChartsDisabled) => Ok(()),
        other => other,
    }
}

fn report_persist_failure(
    saved: Result<Result<(), ExportError>, tokio::task::JoinError>,
) -> Option<&'static str> {
    match saved {
        Ok(Ok(())) => None,
        Ok(Err(e)) => {
            error!("Failed to save report artifacts: {}", e);
            Some(SAVE_FAILED)
        }
        Err(e) => {
            error!("Artifact writer task failed: {}", e);
            Some(SAVE_FAILED)
        }
    }
}

pub(super) async fn download_monthly<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    Path((file_type, station, year, month)): Path<(String, String, String, String)>,
) -> Response {
    let Ok(format) = file_type.parse::<ExportFormat>() else {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    };
    if !is_safe_component(&station) {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    }
    let Some(month) = year
        .parse::<i32>()
        .ok()
        .zip(month.parse::<u32>().ok())
        .and_then(|(y, m)| Month::new(y, m))
    else {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    };

    let layout = &state.layout;
    let window = ObservationWindow::Month(month);
    let path = match format {
        ExportFormat::Pdf => {
            let csv = layout.data_file(&station, &window, ExportFormat::Csv);
            if !csv.is_file() {
                return text(StatusCode::NOT_FOUND, CSV_NOT_FOUND);
            }
            let layout = layout.clone();
            let regenerated = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
                let rows = read_monthly_csv(&csv)?;
                write_monthly_pdf(&layout, &station, month, &rows)
            })
            .await;
            match regenerated {
                Ok(Ok(path)) => path,
                Ok(Err(e)) => {
                    error!("Failed to regenerate PDF: {}", e);
                    return text(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
                }
                Err(e) => {
                    error!("PDF writer task failed: {}", e);
                    return text(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
                }
            }
        }
        _ => layout.data_file(&station, &window, format),
    };

    send_file(path, format.content_type()).await
}

pub(super) async fn download_daily<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    Path((file_type, station, date)): Path<(String, String, String)>,
) -> Response {
    let format = match file_type.parse::<ExportFormat>() {
        Ok(format @ (ExportFormat::Csv | ExportFormat::Json)) => format,
        _ => return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND),
    };
    if !is_safe_component(&station) {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    }
    let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    };

    let path = state
        .layout
        .data_file(&station, &ObservationWindow::Day(date), format);
    send_file(path, format.content_type()).await
}

async fn send_file(path: PathBuf, content_type: &'static str) -> Response {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Requested file {:?} does not exist", path);
            return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
        }
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            return text(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
        }
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

pub(super) async fn static_file<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Response {
    let Some((stem, extension)) = name.rsplit_once('.') else {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    };
    if !is_safe_component(stem) {
        return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    }
    let content_type = match extension {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        _ => return text(StatusCode::NOT_FOUND, FILE_NOT_FOUND),
    };
    match tokio::fs::read(state.layout.static_dir.join(&name)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(_) => text(StatusCode::NOT_FOUND, FILE_NOT_FOUND),
    }
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(super) async fn upload<S: PageSource>(
    State(state): State<Arc<AppState<S>>>,
    mut multipart: Multipart,
) -> Response {
    let (file_name, bytes) = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => break (file_name, bytes),
                    Err(e) => return json_error(e.status(), e.body_text()),
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => return upload_error(UploadError::NoFile),
            Err(e) => return json_error(e.status(), e.body_text()),
        }
    };

    let upload_dir = state.layout.upload_dir.clone();
    let parsed =
        tokio::task::spawn_blocking(move || store_and_parse(&upload_dir, &file_name, &bytes))
            .await;
    match parsed {
        Ok(Ok(dataset)) => {
            info!("Accepted upload with {} rows", dataset.rows.len());
            (
                StatusCode::OK,
                Json(json!({ "success": UPLOAD_SUCCESS, "data": dataset.rows })),
            )
                .into_response()
        }
        Ok(Err(e)) => upload_error(e),
        Err(e) => {
            error!("Upload parser task failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED.to_string())
        }
    }
}

fn upload_error(e: UploadError) -> Response {
    if e.is_client_error() {
        warn!("Rejected upload: {}", e);
        json_error(StatusCode::BAD_REQUEST, e.to_string())
    } else {
        error!("Failed to read upload: {}", e);
        json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}
