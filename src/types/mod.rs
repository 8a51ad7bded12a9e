pub mod daily_aggregate;
pub mod observation;
pub mod period;
pub mod report;
pub mod station_match;
