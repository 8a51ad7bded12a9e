use crate::types::observation::{ObservationRow, RawObservation};
use chrono::NaiveDate;
use log::debug;

/// Splits each timestamp into date and `HH:MM` time and carries the
/// measurements through.
///
/// Records without a timestamp, or whose date part does not parse, are
/// dropped. Input order is preserved.
pub fn normalize(records: &[RawObservation]) -> Vec<ObservationRow> {
    let rows: Vec<ObservationRow> = records.iter().filter_map(normalize_record).collect();
    if rows.len() != records.len() {
        debug!(
            "Dropped {} of {} records without a usable timestamp",
            records.len() - rows.len(),
            records.len()
        );
    }
    rows
}

fn normalize_record(record: &RawObservation) -> Option<ObservationRow> {
    let timestamp = record.timestamp.as_deref()?.trim();
    if timestamp.is_empty() {
        return None;
    }
    let (date_part, time_part) = match timestamp.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (timestamp, None),
    };
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let time = time_part
        .and_then(|t| t.get(..5))
        .map(str::to_string);

    Some(ObservationRow {
        date,
        time,
        temperature: record.temperature.map(round_one_decimal),
        temperature_min: record.min_temperature(),
        temperature_max: record.max_temperature(),
        humidity: record.humidity,
        precipitation: record.precipitation,
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
