use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {0} timed out")]
    Timeout(String, #[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response body from {url}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Classifies a reqwest error raised while sending or reading a response.
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(url.to_string(), error)
        } else if let Some(status) = error.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status,
                source: error,
            }
        } else {
            FetchError::NetworkRequest(url.to_string(), error)
        }
    }
}
