use crate::fetcher::error::FetchError;
use crate::types::observation::RawObservation;
use std::fmt;

/// Why a fetch produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    Timeout,
    Network,
    HttpStatus(u16),
    MalformedBody,
    NoMatchingRecords,
}

impl From<&FetchError> for EmptyReason {
    fn from(error: &FetchError) -> Self {
        match error {
            FetchError::Timeout(..) => EmptyReason::Timeout,
            FetchError::ClientBuild(_) | FetchError::NetworkRequest(..) => EmptyReason::Network,
            FetchError::HttpStatus { status, .. } => EmptyReason::HttpStatus(status.as_u16()),
            FetchError::MalformedBody { .. } => EmptyReason::MalformedBody,
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::Timeout => write!(f, "request timed out"),
            EmptyReason::Network => write!(f, "network failure"),
            EmptyReason::HttpStatus(code) => write!(f, "HTTP status {}", code),
            EmptyReason::MalformedBody => write!(f, "malformed response body"),
            EmptyReason::NoMatchingRecords => write!(f, "no matching records"),
        }
    }
}

/// Result of a fetch. Failures are reported as a typed [`EmptyReason`] rather
/// than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Data(Vec<RawObservation>),
    /// Paging stopped at `max_pages` before the catalog ran out of records.
    Truncated(Vec<RawObservation>),
    Empty(EmptyReason),
}

impl FetchOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, FetchOutcome::Empty(_))
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, FetchOutcome::Truncated(_))
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            FetchOutcome::Data(_) | FetchOutcome::Truncated(_) => None,
            FetchOutcome::Empty(reason) => Some(*reason),
        }
    }

    /// The records, or an empty vector when the fetch failed.
    pub fn into_records(self) -> Vec<RawObservation> {
        match self {
            FetchOutcome::Data(records) | FetchOutcome::Truncated(records) => records,
            FetchOutcome::Empty(_) => Vec::new(),
        }
    }
}
