//! Observation records at each stage of the pipeline: the raw catalog record,
//! the normalized row, and the cleaned synoptic row.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A record as returned by the SYNOP catalog API.
///
/// Only the fields the pipeline consumes are declared; everything else in the
/// payload is ignored. All measurements are nullable because stations do not
/// report every parameter at every synoptic hour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawObservation {
    /// ISO-8601 timestamp, e.g. `2024-03-01T06:00:00+00:00`.
    #[serde(rename = "date")]
    pub timestamp: Option<String>,
    /// Instantaneous temperature in °C.
    #[serde(rename = "tc")]
    pub temperature: Option<f64>,
    /// Minimum temperature over the last 12 hours in °C.
    #[serde(rename = "tn12c")]
    pub temperature_min_12h: Option<f64>,
    #[serde(rename = "tn")]
    pub temperature_min: Option<f64>,
    /// Maximum temperature over the last 12 hours in °C.
    #[serde(rename = "tx12c")]
    pub temperature_max_12h: Option<f64>,
    #[serde(rename = "tx")]
    pub temperature_max: Option<f64>,
    /// Relative humidity in %.
    #[serde(rename = "u")]
    pub humidity: Option<f64>,
    /// Precipitation over the last hour in mm.
    #[serde(rename = "rr1")]
    pub precipitation: Option<f64>,
    /// Human readable station name, e.g. `ROUEN-BOOS`.
    #[serde(rename = "nom")]
    pub station: Option<String>,
}

impl RawObservation {
    /// Minimum temperature, preferring the 12 hour reading.
    pub fn min_temperature(&self) -> Option<f64> {
        self.temperature_min_12h.or(self.temperature_min)
    }

    /// Maximum temperature, preferring the 12 hour reading.
    pub fn max_temperature(&self) -> Option<f64> {
        self.temperature_max_12h.or(self.temperature_max)
    }
}

/// A raw observation split into calendar date and time of day.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub date: NaiveDate,
    /// `HH:MM`, unparsed. `None` when the timestamp carried no time part.
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
}

/// One row of a [`CleanedSeries`]: a synoptic reading with temperature and
/// humidity guaranteed present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedObservation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Heure", with = "hour_minute")]
    pub time: NaiveTime,
    #[serde(rename = "Température (°C)")]
    pub temperature: f64,
    #[serde(rename = "Humidité (%)")]
    pub humidity: f64,
    #[serde(rename = "Précipitations (mm)")]
    pub precipitation: Option<f64>,
}

/// Cleaned observations sorted and unique by `(date, time)`.
pub type CleanedSeries = Vec<CleanedObservation>;

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
