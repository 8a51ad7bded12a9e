//! The cleaning and degree-day pipeline: pure transformations over
//! in-memory rows.

pub mod aggregate;
pub mod degree_days;
pub mod interpolate;
pub mod normalize;
pub mod resample;

pub use aggregate::aggregate_daily;
pub use degree_days::{degree_days, growing_degree_days};
pub use interpolate::interpolate_linear;
pub use normalize::normalize;
pub use resample::clean_daily;
