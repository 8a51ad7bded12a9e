use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day summary used in monthly mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Température min (°C)")]
    pub temperature_min: Option<f64>,
    #[serde(rename = "Température max (°C)")]
    pub temperature_max: Option<f64>,
    #[serde(rename = "Humidité (%)")]
    pub humidity_mean: Option<f64>,
}

/// A [`DailyAggregate`] extended with growing degree days.
///
/// `gdd` is `None` when the day lacks a minimum or maximum temperature; such a
/// day adds nothing to `gdd_cumulative`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeDay {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Température min (°C)")]
    pub temperature_min: Option<f64>,
    #[serde(rename = "Température max (°C)")]
    pub temperature_max: Option<f64>,
    #[serde(rename = "Humidité (%)")]
    pub humidity_mean: Option<f64>,
    #[serde(rename = "GDD")]
    pub gdd: Option<f64>,
    #[serde(rename = "GDD cumulés")]
    pub gdd_cumulative: f64,
}

impl DegreeDay {
    pub fn aggregate(&self) -> DailyAggregate {
        DailyAggregate {
            date: self.date,
            temperature_min: self.temperature_min,
            temperature_max: self.temperature_max,
            humidity_mean: self.humidity_mean,
        }
    }
}
