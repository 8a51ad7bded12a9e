pub mod error;
pub mod observation_fetcher;
pub mod outcome;
pub mod page_source;

pub use error::FetchError;
pub use observation_fetcher::ObservationFetcher;
pub use outcome::{EmptyReason, FetchOutcome};
pub use page_source::{HttpPageSource, PageQuery, PageSource};

#[cfg(test)]
pub(crate) mod testing;
