//! Provides the `DailyClient` for requesting the synoptic readings of one day.
//!
//! This client acts as an intermediate builder, obtained via [`Synop::daily()`],
//! allowing the user to name the station and date before running the fetch and
//! cleaning pipeline.

use crate::fetcher::{FetchOutcome, PageSource};
use crate::pipeline::{clean_daily, normalize};
use crate::synop::Synop;
use crate::types::period::ObservationWindow;
use crate::types::report::DailyReport;
use bon::bon;
use chrono::NaiveDate;
use log::info;

/// A client builder for daily reports.
///
/// Instances are created by calling [`Synop::daily()`]. Calling
/// `.station(..).date(..).call()` fetches every record of the day, keeps the
/// synoptic readings and returns a [`DailyReport`].
pub struct DailyClient<'a, S> {
    /// A reference to the main Synop client instance.
    client: &'a Synop<S>,
}

#[bon]
impl<'a, S: PageSource> DailyClient<'a, S> {
    /// Creates a new `DailyClient`.
    ///
    /// This is typically called internally by [`Synop::daily()`] and not directly by users.
    ///
    /// # Arguments
    ///
    /// * `client` - A reference to the configured `Synop` instance.
    pub(crate) fn new(client: &'a Synop<S>) -> Self {
        Self { client }
    }

    /// Fetches and cleans the readings of `station` on one date.
    ///
    /// # Arguments
    ///
    /// * `station` - The station name as listed in the catalog's `nom` field
    ///   (e.g., "ROUEN-BOOS"). Matched exactly or as a substring depending on
    ///   the configured [`StationMatch`](crate::StationMatch).
    /// * `.date(NaiveDate)` - The calendar day to fetch.
    ///
    /// # Returns
    ///
    /// A [`DailyReport`] holding the synoptic series sorted by time. With the
    /// default options readings are floored to 3 hour slots, slots sharing a
    /// time are merged and interior gaps are interpolated.
    ///
    /// # Errors
    ///
    /// Never fails. A fetch that comes back empty is recorded in
    /// [`DailyReport::empty_reason`]; a fetch whose rows are all dropped by
    /// cleaning yields an empty series with no reason. Use
    /// [`DailyReport::status`] to tell the cases apart. A fetch stopped by
    /// the page cap sets [`DailyReport::truncated`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use synop::{parse_date, Synop, SynopConfig, SynopError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SynopError> {
    /// let synop = Synop::new(&SynopConfig::default())?;
    /// let report = synop
    ///     .daily()
    ///     .station("ROUEN-BOOS")
    ///     .date(parse_date("2024-03-01")?)
    ///     .call()
    ///     .await;
    /// if let Some(message) = report.status().message() {
    ///     println!("{}", message);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = station)]
    #[doc(hidden)]
    pub async fn build_station(
        &self,
        #[builder(start_fn)] station: &str,
        date: NaiveDate,
    ) -> DailyReport {
        let outcome = self
            .client
            .observations()
            .station(station)
            .window(ObservationWindow::Day(date))
            .call()
            .await;

        let truncated = outcome.is_truncated();
        let (empty_reason, series) = match outcome {
            FetchOutcome::Empty(reason) => (Some(reason), Vec::new()),
            FetchOutcome::Data(records) | FetchOutcome::Truncated(records) => {
                let rows = normalize(&records);
                let series = clean_daily(&rows, self.client.options());
                info!(
                    "Kept {} of {} readings for '{}' on {}",
                    series.len(),
                    records.len(),
                    station,
                    date
                );
                (None, series)
            }
        };

        DailyReport {
            station: station.trim().to_string(),
            date,
            empty_reason,
            truncated,
            series,
        }
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
    use chrono::NaiveTime;

    fn reading(
        hour: u32,
        minute: u32,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> RawObservation {
        let mut record = synop_record(
            "ROUEN-BOOS",
            &format!("2024-03-01T{:02}:{:02}:00+00:00", hour, minute),
        );
        record.temperature = temperature;
        record.humidity = humidity;
        record
    }

    fn synop(records: Vec<RawObservation>) -> Synop<FixedSource> {
        Synop::with_source(
            FixedSource { records },
            &ApiConfig {
                page_size: 2,
                ..ApiConfig::default()
            },
            PipelineOptions::default(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_daily_report_is_sorted_bucketed_and_interpolated() {
        let client = synop(vec![
            reading(6, 0, Some(7.0), Some(80.0)),
            reading(0, 0, Some(1.0), Some(90.0)),
            reading(3, 20, None, Some(85.0)),
            reading(4, 0, Some(50.0), Some(10.0)),
        ]);

        let report = client.daily().station("ROUEN").date(date()).call().await;

        assert_eq!(report.status(), ReportStatus::Ready);
        let times: Vec<NaiveTime> = report.series.iter().map(|r| r.time).collect();
        assert_eq!(
            times,
            vec![
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            ]
        );
        // 03:20 and 04:00 share a slot: humidity from 03:20, temperature from 04:00.
        assert_eq!(report.series[1].temperature, 50.0);
        assert_eq!(report.series[1].humidity, 85.0);
    }

    #[tokio::test]
    async fn test_interior_gap_is_interpolated() {
        let client = synop(vec![
            reading(0, 0, Some(1.0), Some(90.0)),
            reading(3, 0, None, Some(85.0)),
            reading(6, 0, Some(7.0), Some(80.0)),
        ]);

        let report = client.daily().station("ROUEN").date(date()).call().await;

        assert_eq!(report.series.len(), 3);
        assert_eq!(report.series[1].temperature, 4.0);
        assert!(!report.truncated);
    }

    #[tokio::test]
    async fn test_page_cap_marks_report_truncated() {
        let records = (0..8).map(|h| reading(h * 3, 0, Some(5.0), Some(80.0))).collect();
        let client = Synop::with_source(
            FixedSource { records },
            &ApiConfig {
                page_size: 2,
                max_pages: 2,
                ..ApiConfig::default()
            },
            PipelineOptions::default(),
        );

        let report = client.daily().station("ROUEN-BOOS").date(date()).call().await;

        assert_eq!(report.status(), ReportStatus::Ready);
        assert_eq!(report.series.len(), 4);
        assert!(report.truncated);
        assert!(report.warning().is_some());
    }

    #[tokio::test]
    async fn test_unknown_station_reports_no_data() {
        let client = synop(vec![reading(0, 0, Some(1.0), Some(90.0))]);

        let report = client.daily().station("BREST").date(date()).call().await;

        assert!(report.series.is_empty());
        assert_eq!(
            report.status(),
            ReportStatus::NoData(EmptyReason::NoMatchingRecords)
        );
    }

    #[tokio::test]
    async fn test_rows_without_values_report_no_usable_data() {
        let client = synop(vec![reading(0, 0, None, None), reading(3, 0, None, None)]);

        let report = client.daily().station("ROUEN-BOOS").date(date()).call().await;

        assert_eq!(report.status(), ReportStatus::NoUsableData);
    }
}
