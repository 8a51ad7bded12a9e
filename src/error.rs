use crate::config::ConfigError;
use crate::fetcher::FetchError;
use crate::frames::FrameError;
use crate::present::ExportError;
use crate::upload::UploadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynopError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Format de date invalide. Veuillez entrer une date valide (YYYY-MM-DD).")]
    InvalidDate(String, #[source] chrono::ParseError),

    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Aucune donnée trouvée.")]
    NoData,

    #[error("Aucune donnée exploitable.")]
    NoUsableData,

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
