use crate::config::ApiConfig;
use crate::fetcher::error::FetchError;
use crate::fetcher::outcome::{EmptyReason, FetchOutcome};
use crate::fetcher::page_source::{PageQuery, PageSource};
use crate::types::observation::RawObservation;
use crate::types::period::ObservationWindow;
use crate::types::station_match::StationMatch;
use log::{error, info, warn};

/// Pages through the catalog for one station and window.
pub struct ObservationFetcher<S> {
    source: S,
    page_size: usize,
    max_pages: usize,
}

impl<S: PageSource> ObservationFetcher<S> {
    pub fn new(source: S, config: &ApiConfig) -> Self {
        Self {
            source,
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every record for `station` within `window`.
    ///
    /// The station predicate is sent in the `where` clause and checked again
    /// on every record received.
    ///
    /// Never fails: each failure is logged and reported as
    /// [`FetchOutcome::Empty`]. A failure on any page discards the pages
    /// already received. Hitting the page cap yields
    /// [`FetchOutcome::Truncated`].
    pub async fn fetch(
        &self,
        station: &str,
        window: &ObservationWindow,
        station_match: StationMatch,
    ) -> FetchOutcome {
        let (records, truncated) =
            match self.fetch_all_pages(station, window, station_match).await {
                Ok(pages) => pages,
                Err(e) => {
                    log_failure(station, window, &e);
                    return FetchOutcome::Empty(EmptyReason::from(&e));
                }
            };

        let received = records.len();
        let matching: Vec<RawObservation> = records
            .into_iter()
            .filter(|record| {
                record
                    .station
                    .as_deref()
                    .is_some_and(|name| station_match.matches(station, name))
            })
            .collect();

        if matching.is_empty() {
            warn!(
                "No records for station '{}' in {} ({} received before station filter)",
                station, window, received
            );
            return FetchOutcome::Empty(EmptyReason::NoMatchingRecords);
        }

        info!(
            "Fetched {} records for station '{}' in {}",
            matching.len(),
            station,
            window
        );
        if truncated {
            FetchOutcome::Truncated(matching)
        } else {
            FetchOutcome::Data(matching)
        }
    }

    async fn fetch_all_pages(
        &self,
        station: &str,
        window: &ObservationWindow,
        station_match: StationMatch,
    ) -> Result<(Vec<RawObservation>, bool), FetchError> {
        let mut query = PageQuery {
            where_clause: format!(
                "{} AND {}",
                window.where_clause(),
                station_match.where_predicate(station)
            ),
            refine_station: match station_match {
                StationMatch::Exact => Some(station.to_string()),
                StationMatch::Substring => None,
            },
            limit: self.page_size,
            offset: 0,
        };

        let mut records = Vec::new();
        for _ in 0..self.max_pages {
            let page = self.source.fetch_page(&query).await?;
            if page.is_empty() {
                return Ok((records, false));
            }
            query.offset += page.len();
            records.extend(page);
        }

        warn!(
            "Stopped paging for station '{}' in {} after {} pages ({} records)",
            station,
            window,
            self.max_pages,
            records.len()
        );
        Ok((records, true))
    }
}

fn log_failure(station: &str, window: &ObservationWindow, e: &FetchError) {
    match e {
        FetchError::Timeout(url, _) => {
            error!("Timed out fetching {} for station '{}' from {}", window, station, url)
        }
        FetchError::HttpStatus { url, status, .. } => error!(
            "HTTP {} fetching {} for station '{}' from {}",
            status, window, station, url
        ),
        FetchError::MalformedBody { url, source } => error!(
            "Malformed response fetching {} for station '{}' from {}: {}",
            window, station, url, source
        ),
        FetchError::NetworkRequest(url, source) => error!(
            "Network failure fetching {} for station '{}' from {}: {}",
            window, station, url, source
        ),
        FetchError::ClientBuild(source) => {
            error!("Could not build HTTP client: {}", source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Serves canned pages and records the queries it received.
    struct ScriptedSource {
        pages: Mutex<Vec<Result<Vec<RawObservation>, FetchError>>>,
        queries: Mutex<Vec<PageQuery>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Vec<RawObservation>, FetchError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into_iter().rev().collect()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<RawObservation>, FetchError> {
            self.queries.lock().unwrap().push(query.clone());
            self.pages.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }
    }

    fn record(station: &str, hour: u32) -> RawObservation {
        RawObservation {
            timestamp: Some(format!("2024-03-01T{:02}:00:00+00:00", hour)),
            temperature: Some(5.0),
            humidity: Some(80.0),
            station: Some(station.to_string()),
            ..Default::default()
        }
    }

    fn window() -> ObservationWindow {
        ObservationWindow::Day(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn malformed() -> FetchError {
        FetchError::MalformedBody {
            url: "http://test".to_string(),
            source: serde_json::from_str::<Vec<u8>>("{").unwrap_err(),
        }
    }

    #[tokio::test]
    async fn test_pages_until_empty_page() {
        let full: Vec<_> = (0..100).map(|i| record("ROUEN-BOOS", i % 24)).collect();
        let source = ScriptedSource::new(vec![Ok(full), Ok(Vec::new())]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        let outcome = fetcher
            .fetch("ROUEN", &window(), StationMatch::Substring)
            .await;

        assert_eq!(outcome.into_records().len(), 100);
        assert_eq!(fetcher.source().query_count(), 2);
        let queries = fetcher.source().queries.lock().unwrap();
        assert_eq!(queries[1].offset, 100);
        assert_eq!(queries[0].refine_station, None);
        assert_eq!(
            queries[0].where_clause,
            "date >= '2024-03-01T00:00:00Z' AND date <= '2024-03-01T23:59:59Z' \
             AND nom like \"%ROUEN%\""
        );
    }

    #[tokio::test]
    async fn test_short_page_does_not_end_paging() {
        let source = ScriptedSource::new(vec![
            Ok(vec![record("ROUEN-BOOS", 0)]),
            Ok(vec![record("ROUEN-BOOS", 3)]),
            Ok(Vec::new()),
        ]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        let records = fetcher
            .fetch("ROUEN-BOOS", &window(), StationMatch::Exact)
            .await
            .into_records();

        assert_eq!(records.len(), 2);
        assert_eq!(fetcher.source().query_count(), 3);
    }

    #[tokio::test]
    async fn test_stops_at_page_cap() {
        let pages = (0..5).map(|h| Ok(vec![record("ROUEN-BOOS", h)])).collect();
        let config = ApiConfig {
            max_pages: 3,
            ..ApiConfig::default()
        };
        let fetcher = ObservationFetcher::new(ScriptedSource::new(pages), &config);

        let outcome = fetcher
            .fetch("ROUEN", &window(), StationMatch::Substring)
            .await;

        assert!(outcome.is_truncated());
        assert_eq!(outcome.into_records().len(), 3);
        assert_eq!(fetcher.source().query_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_on_later_page_discards_everything() {
        let source = ScriptedSource::new(vec![Ok(vec![record("ROUEN-BOOS", 0)]), Err(malformed())]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        let outcome = fetcher
            .fetch("ROUEN", &window(), StationMatch::Substring)
            .await;

        assert_eq!(outcome, FetchOutcome::Empty(EmptyReason::MalformedBody));
    }

    #[tokio::test]
    async fn test_station_filter() {
        let source = ScriptedSource::new(vec![Ok(vec![
            record("ROUEN-BOOS", 0),
            record("BREST-GUIPAVAS", 0),
        ])]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        let records = fetcher
            .fetch("rouen", &window(), StationMatch::Substring)
            .await
            .into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].station.as_deref(), Some("ROUEN-BOOS"));
    }

    #[tokio::test]
    async fn test_no_match_is_reported() {
        let source = ScriptedSource::new(vec![Ok(vec![record("BREST-GUIPAVAS", 0)])]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        let outcome = fetcher
            .fetch("ROUEN", &window(), StationMatch::Substring)
            .await;
        assert_eq!(outcome, FetchOutcome::Empty(EmptyReason::NoMatchingRecords));
    }

    #[tokio::test]
    async fn test_exact_match_refines_query() {
        let source = ScriptedSource::new(vec![Ok(Vec::new())]);
        let fetcher = ObservationFetcher::new(source, &ApiConfig::default());

        fetcher
            .fetch("ROUEN-BOOS", &window(), StationMatch::Exact)
            .await;

        let queries = fetcher.source().queries.lock().unwrap();
        assert_eq!(queries[0].refine_station.as_deref(), Some("ROUEN-BOOS"));
        assert!(queries[0].where_clause.ends_with(r#"AND nom = "ROUEN-BOOS""#));
    }
}
