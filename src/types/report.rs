use crate::error::SynopError;
use crate::fetcher::EmptyReason;
use crate::types::daily_aggregate::DegreeDay;
use crate::types::observation::CleanedSeries;
use crate::types::period::Month;
use chrono::NaiveDate;

/// Shown alongside a report built from a fetch stopped by the page cap.
pub const TRUNCATED_WARNING: &str = "Résultats incomplets : limite de pages atteinte.";

/// Whether a report has something to show, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Ready,
    /// The fetch produced no records at all.
    NoData(EmptyReason),
    /// Records were fetched but none survived cleaning or aggregation.
    NoUsableData,
}

impl ReportStatus {
    /// Message shown to users for an empty report.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ReportStatus::Ready => None,
            ReportStatus::NoData(_) => Some("Aucune donnée trouvée."),
            ReportStatus::NoUsableData => Some("Aucune donnée exploitable."),
        }
    }

    /// `Ok` for a ready report, the matching error otherwise.
    pub fn into_result(self) -> Result<(), SynopError> {
        match self {
            ReportStatus::Ready => Ok(()),
            ReportStatus::NoData(_) => Err(SynopError::NoData),
            ReportStatus::NoUsableData => Err(SynopError::NoUsableData),
        }
    }

    fn of(empty_reason: Option<EmptyReason>, is_empty: bool) -> Self {
        match empty_reason {
            Some(reason) => ReportStatus::NoData(reason),
            None if is_empty => ReportStatus::NoUsableData,
            None => ReportStatus::Ready,
        }
    }
}

/// Cleaned synoptic readings of one station over one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub station: String,
    pub date: NaiveDate,
    /// Set when the fetch came back empty.
    pub empty_reason: Option<EmptyReason>,
    /// The fetch stopped at the page cap, so later readings may be missing.
    pub truncated: bool,
    pub series: CleanedSeries,
}

impl DailyReport {
    pub fn status(&self) -> ReportStatus {
        ReportStatus::of(self.empty_reason, self.series.is_empty())
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.truncated.then_some(TRUNCATED_WARNING)
    }
}

/// Daily aggregates and growing degree days of one station over one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub station: String,
    pub month: Month,
    pub base_temperature: f64,
    pub empty_reason: Option<EmptyReason>,
    pub truncated: bool,
    pub series: Vec<DegreeDay>,
}

impl MonthlyReport {
    pub fn status(&self) -> ReportStatus {
        ReportStatus::of(self.empty_reason, self.series.is_empty())
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.truncated.then_some(TRUNCATED_WARNING)
    }

    /// Cumulative GDD at the end of the month, `0.0` for an empty report.
    pub fn total_gdd(&self) -> f64 {
        self.series.last().map_or(0.0, |day| day.gdd_cumulative)
    }
}
