mod clients;
mod config;
mod error;
mod fetcher;
mod frames;
pub mod logging;
mod pipeline;
pub mod present;
mod synop;
mod types;
pub mod upload;
pub mod web;

pub use error::SynopError;
pub use synop::*;

pub use clients::daily_client::*;
pub use clients::monthly_client::*;

pub use config::{
    ApiConfig, ConfigError, LoggingConfig, OutputConfig, PipelineOptions, ServerConfig,
    SynopConfig, CONFIG_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE,
};

pub use fetcher::{
    EmptyReason, FetchError, FetchOutcome, HttpPageSource, ObservationFetcher, PageQuery,
    PageSource,
};

pub use frames::convert::*;
pub use frames::{
    FrameError, COL_DATE, COL_GDD, COL_GDD_CUMULATIVE, COL_HUMIDITY, COL_PRECIPITATION,
    COL_TEMPERATURE, COL_TEMPERATURE_MAX, COL_TEMPERATURE_MIN, COL_TIME,
};

pub use pipeline::{
    aggregate_daily, clean_daily, degree_days, growing_degree_days, interpolate_linear, normalize,
};

pub use types::daily_aggregate::*;
pub use types::observation::*;
pub use types::period::{parse_date, Month, ObservationWindow};
pub use types::report::*;
pub use types::station_match::StationMatch;
