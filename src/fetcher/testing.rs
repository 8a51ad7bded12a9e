use crate::fetcher::{FetchError, PageQuery, PageSource};
use crate::types::observation::RawObservation;

/// Serves a fixed set of records, sliced by `offset` and `limit`.
pub(crate) struct FixedSource {
    pub records: Vec<RawObservation>,
}

impl PageSource for FixedSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<RawObservation>, FetchError> {
        Ok(self
            .records
            .iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

pub(crate) fn synop_record(station: &str, timestamp: &str) -> RawObservation {
    RawObservation {
        timestamp: Some(timestamp.to_string()),
        station: Some(station.to_string()),
        ..Default::default()
    }
}
