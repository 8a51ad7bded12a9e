use crate::config::ApiConfig;
use crate::fetcher::error::FetchError;
use crate::types::observation::RawObservation;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Parameters of one page request against the records endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub where_clause: String,
    /// Sent as `refine.nom` when set.
    pub refine_station: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl PageQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("where", self.where_clause.clone()),
            ("sort", "date".to_string()),
        ];
        if let Some(station) = &self.refine_station {
            params.push(("refine.nom", station.clone()));
        }
        params
    }
}

/// Something that can serve one page of catalog records.
pub trait PageSource: Send + Sync {
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Vec<RawObservation>, FetchError>> + Send;
}

#[derive(Deserialize)]
struct RecordsPage {
    results: Vec<RawObservation>,
}

/// [`PageSource`] backed by the OpenDataSoft records API.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base_url: String,
}

impl HttpPageSource {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<RawObservation>, FetchError> {
        let url = &self.base_url;
        debug!("Requesting {} (offset {})", url, query.offset);

        let response = self
            .client
            .get(url)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?
            .error_for_status()
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let page: RecordsPage =
            serde_json::from_slice(&body).map_err(|e| FetchError::MalformedBody {
                url: url.clone(),
                source: e,
            })?;
        Ok(page.results)
    }
}
