//! Provides the `MonthlyClient` for requesting daily aggregates and growing
//! degree days over a calendar month.

use crate::error::SynopError;
use crate::fetcher::{FetchOutcome, PageSource};
use crate::pipeline::{aggregate_daily, degree_days, normalize};
use crate::synop::Synop;
use crate::types::period::{Month, ObservationWindow};
use crate::types::report::MonthlyReport;
use bon::bon;
use log::info;

/// A client builder for monthly reports.
///
/// Instances are created by calling [`Synop::monthly()`]. Calling
/// `.station(..).year(..).month(..).call()` fetches every record of the month,
/// aggregates them per calendar day and returns a [`MonthlyReport`] with
/// growing degree days.
pub struct MonthlyClient<'a, S> {
    /// A reference to the main Synop client instance.
    client: &'a Synop<S>,
}

#[bon]
impl<'a, S: PageSource> MonthlyClient<'a, S> {
    /// Creates a new `MonthlyClient`.
    ///
    /// This is typically called internally by [`Synop::monthly()`] and not directly by users.
    ///
    /// # Arguments
    ///
    /// * `client` - A reference to the configured `Synop` instance.
    pub(crate) fn new(client: &'a Synop<S>) -> Self {
        Self { client }
    }

    /// Fetches a month of records for `station`, aggregates them per day and
    /// adds growing degree days.
    ///
    /// # Arguments
    ///
    /// * `station` - The station name as listed in the catalog's `nom` field
    ///   (e.g., "ROUEN-BOOS").
    /// * `.year(i32)` - The calendar year.
    /// * `.month(u32)` - The month, `1..=12`.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.base_temperature(f64)`: GDD base in °C. Defaults to the configured
    ///   `pipeline.base_temperature`.
    ///
    /// # Returns
    ///
    /// A `Result` containing a [`MonthlyReport`]: one [`DegreeDay`](crate::DegreeDay)
    /// per day with readings, sorted by date, with the running GDD total.
    ///
    /// # Errors
    ///
    /// Returns [`SynopError::InvalidMonth`] before any request when `month` is
    /// not within `1..=12`, and [`SynopError::Frame`] if aggregation fails.
    /// An empty fetch is not an error, see [`MonthlyReport::status`]. Nor is a
    /// fetch stopped by the page cap, which sets [`MonthlyReport::truncated`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use synop::{Synop, SynopConfig, SynopError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SynopError> {
    /// let synop = Synop::new(&SynopConfig::default())?;
    /// let report = synop
    ///     .monthly()
    ///     .station("ROUEN-BOOS")
    ///     .year(2024)
    ///     .month(5)
    ///     .base_temperature(6.0)
    ///     .call()
    ///     .await?;
    /// println!("GDD: {:.1}", report.total_gdd());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = station)]
    #[doc(hidden)]
    pub async fn build_station(
        &self,
        #[builder(start_fn)] station: &str,
        year: i32,
        month: u32,
        base_temperature: Option<f64>,
    ) -> Result<MonthlyReport, SynopError> {
        let month = Month::try_new(year, month)?;
        let base_temperature =
            base_temperature.unwrap_or(self.client.options().base_temperature);

        let outcome = self
            .client
            .observations()
            .station(station)
            .window(ObservationWindow::Month(month))
            .call()
            .await;

        let truncated = outcome.is_truncated();
        let (empty_reason, series) = match outcome {
            FetchOutcome::Empty(reason) => (Some(reason), Vec::new()),
            FetchOutcome::Data(records) | FetchOutcome::Truncated(records) => {
                let aggregates = aggregate_daily(&normalize(&records))?;
                info!(
                    "Aggregated {} records for '{}' into {} days of {}",
                    records.len(),
                    station,
                    aggregates.len(),
                    month
                );
                (None, degree_days(&aggregates, base_temperature))
            }
        };

        Ok(MonthlyReport {
            station: station.trim().to_string(),
            month,
            base_temperature,
            empty_reason,
            truncated,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, PipelineOptions};
    use crate::fetcher::testing::{synop_record, FixedSource};
    use crate::fetcher::EmptyReason;
    use crate::types::observation::RawObservation;
    use crate::types::report::ReportStatus;

    fn reading(day: u32, hour: u32, min: f64, max: f64, humidity: f64) -> RawObservation {
        let mut record = synop_record(
            "ROUEN-BOOS",
            &format!("2024-05-{:02}T{:02}:00:00+00:00", day, hour),
        );
        record.temperature_min_12h = Some(min);
        record.temperature_max_12h = Some(max);
        record.humidity = Some(humidity);
        record
    }

    fn synop(records: Vec<RawObservation>) -> Synop<FixedSource> {
        Synop::with_source(
            FixedSource { records },
            &ApiConfig::default(),
            PipelineOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_monthly_report_accumulates_gdd() -> Result<(), SynopError> {
        let client = synop(vec![
            reading(2, 6, 15.0, 25.0, 50.0),
            reading(1, 6, 5.0, 15.0, 80.0),
            reading(1, 18, 7.0, 13.0, 60.0),
            reading(2, 18, 16.0, 24.0, 70.0),
        ]);

        let report = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(5)
            .call()
            .await?;

        assert_eq!(report.status(), ReportStatus::Ready);
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.series[0].temperature_min, Some(5.0));
        assert_eq!(report.series[0].temperature_max, Some(15.0));
        assert_eq!(report.series[0].humidity_mean, Some(70.0));
        assert_eq!(report.series[0].gdd, Some(0.0));
        assert_eq!(report.series[1].gdd, Some(10.0));
        assert_eq!(report.total_gdd(), 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_base_temperature_override() -> Result<(), SynopError> {
        let client = synop(vec![reading(1, 6, 5.0, 15.0, 80.0)]);

        let report = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(5)
            .base_temperature(6.0)
            .call()
            .await?;

        assert_eq!(report.base_temperature, 6.0);
        assert_eq!(report.total_gdd(), 4.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let client = synop(Vec::new());
        let result = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(13)
            .call()
            .await;
        assert!(matches!(
            result,
            Err(SynopError::InvalidMonth { year: 2024, month: 13 })
        ));
    }

    #[tokio::test]
    async fn test_empty_fetch_is_not_an_error() -> Result<(), SynopError> {
        let client = synop(Vec::new());
        let report = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(5)
            .call()
            .await?;
        assert_eq!(
            report.status(),
            ReportStatus::NoData(EmptyReason::NoMatchingRecords)
        );
        assert_eq!(report.total_gdd(), 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_every_day_of_the_month_is_kept() -> Result<(), SynopError> {
        let records = (1..=31)
            .flat_map(|day| [reading(day, 6, 5.0, 15.0, 80.0), reading(day, 18, 7.0, 17.0, 60.0)])
            .collect();
        let client = synop(records);

        let report = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(5)
            .call()
            .await?;

        assert_eq!(report.series.len(), 31);
        assert!(!report.truncated);
        assert_eq!(report.total_gdd(), 31.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_page_cap_marks_report_truncated() -> Result<(), SynopError> {
        let records = (1..=10).map(|day| reading(day, 6, 5.0, 15.0, 80.0)).collect();
        let client = Synop::with_source(
            FixedSource { records },
            &ApiConfig {
                page_size: 3,
                max_pages: 2,
                ..ApiConfig::default()
            },
            PipelineOptions::default(),
        );

        let report = client
            .monthly()
            .station("ROUEN-BOOS")
            .year(2024)
            .month(5)
            .call()
            .await?;

        assert_eq!(report.series.len(), 6);
        assert!(report.truncated);
        assert_eq!(report.warning(), Some(crate::types::report::TRUNCATED_WARNING));
        Ok(())
    }
}
