//! The main entry point: a client that fetches SYNOP observations for a
//! station and turns them into daily or monthly reports.

use crate::clients::daily_client::DailyClient;
use crate::clients::monthly_client::MonthlyClient;
use crate::config::{ApiConfig, PipelineOptions, SynopConfig};
use crate::error::SynopError;
use crate::fetcher::{FetchOutcome, HttpPageSource, ObservationFetcher, PageSource};
use crate::types::period::ObservationWindow;
use crate::types::station_match::StationMatch;
use bon::bon;

/// Client for the SYNOP catalog.
///
/// Holds the page fetcher and the pipeline options every report is built
/// with. It is immutable once created and can be shared between tasks.
///
/// # Examples
///
/// ```no_run
/// # use synop::{Synop, SynopConfig, SynopError};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), SynopError> {
/// let synop = Synop::new(&SynopConfig::default())?;
/// let report = synop
///     .daily()
///     .station("ROUEN-BOOS")
///     .date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
///     .call()
///     .await;
/// println!("{} readings", report.series.len());
/// # Ok(())
/// # }
/// ```
pub struct Synop<S = HttpPageSource> {
    fetcher: ObservationFetcher<S>,
    options: PipelineOptions,
}

impl Synop<HttpPageSource> {
    /// Creates a client talking to the configured records endpoint.
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded [`SynopConfig`]. Its `api` section sets the
    ///   endpoint, page size, page cap and timeout; its `pipeline` section the
    ///   options every report is built with.
    ///
    /// # Returns
    ///
    /// A `Result` containing the new `Synop` client.
    ///
    /// # Errors
    ///
    /// Returns [`SynopError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &SynopConfig) -> Result<Self, SynopError> {
        let source = HttpPageSource::new(&config.api)?;
        Ok(Self::with_source(source, &config.api, config.pipeline.clone()))
    }
}

#[bon]
impl<S: PageSource> Synop<S> {
    /// Creates a client on top of any [`PageSource`].
    ///
    /// # Arguments
    ///
    /// * `source` - Serves one page of catalog records per request.
    /// * `api` - Page size and page cap used when paging through `source`.
    /// * `options` - Cleaning and aggregation options for every report.
    pub fn with_source(source: S, api: &ApiConfig, options: PipelineOptions) -> Self {
        Self {
            fetcher: ObservationFetcher::new(source, api),
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Requests cleaned synoptic readings of a single day.
    ///
    /// # Returns
    ///
    /// A [`DailyClient`] builder. Name the station with `.station(..)`, the day
    /// with `.date(..)`, then `.call().await`.
    pub fn daily(&self) -> DailyClient<'_, S> {
        DailyClient::new(self)
    }

    /// Requests daily aggregates and growing degree days of a month.
    ///
    /// # Returns
    ///
    /// A [`MonthlyClient`] builder taking `.station(..)`, `.year(..)`,
    /// `.month(..)` and optionally `.base_temperature(..)`.
    pub fn monthly(&self) -> MonthlyClient<'_, S> {
        MonthlyClient::new(self)
    }

    /// Fetches the raw records of a station over a window.
    ///
    /// # Arguments
    ///
    /// * `station` - The station name, sent in the catalog `where` clause.
    /// * `.window(ObservationWindow)` - A single day or a calendar month.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.station_match(StationMatch)`: defaults to the configured pipeline
    ///   option.
    ///
    /// # Returns
    ///
    /// A [`FetchOutcome`]. It is never an error: failures come back as
    /// [`FetchOutcome::Empty`] with the reason, and a fetch stopped by the
    /// page cap as [`FetchOutcome::Truncated`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use synop::{Month, ObservationWindow, StationMatch, Synop, SynopConfig, SynopError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SynopError> {
    /// let synop = Synop::new(&SynopConfig::default())?;
    /// let outcome = synop
    ///     .observations()
    ///     .station("ROUEN-BOOS")
    ///     .window(ObservationWindow::Month(Month::try_new(2024, 5)?))
    ///     .station_match(StationMatch::Exact)
    ///     .call()
    ///     .await;
    /// println!("{} records", outcome.into_records().len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn observations(
        &self,
        station: &str,
        window: ObservationWindow,
        station_match: Option<StationMatch>,
    ) -> FetchOutcome {
        let station_match = station_match.unwrap_or(self.options.station_match);
        self.fetcher
            .fetch(station.trim(), &window, station_match)
            .await
    }
}
