use crate::frames::convert::{frame_to_aggregates, rows_to_frame};
use crate::frames::{FrameError, COL_DATE, COL_HUMIDITY, COL_TEMPERATURE_MAX, COL_TEMPERATURE_MIN};
use crate::types::daily_aggregate::DailyAggregate;
use crate::types::observation::ObservationRow;
use polars::prelude::*;

/// Groups rows by date into daily min/max temperature and mean humidity.
///
/// Nulls are ignored within a group; a group with only nulls yields null.
/// Output is ascending by date with one entry per distinct date.
pub fn aggregate_daily(rows: &[ObservationRow]) -> Result<Vec<DailyAggregate>, FrameError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let df = rows_to_frame(rows)?
        .lazy()
        .group_by([col(COL_DATE)])
        .agg([
            col(COL_TEMPERATURE_MIN).min(),
            col(COL_TEMPERATURE_MAX).max(),
            col(COL_HUMIDITY).mean(),
        ])
        .sort([COL_DATE], Default::default())
        .collect()?;
    frame_to_aggregates(&df)
}
