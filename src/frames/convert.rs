use crate::frames::{
    date_values, float_values, text_values, FrameError, COL_DATE, COL_GDD, COL_GDD_CUMULATIVE,
    COL_HUMIDITY, COL_PRECIPITATION, COL_TEMPERATURE, COL_TEMPERATURE_MAX, COL_TEMPERATURE_MIN,
    COL_TIME,
};
use crate::types::daily_aggregate::{DailyAggregate, DegreeDay};
use crate::types::observation::{CleanedObservation, ObservationRow};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;

fn date_strings<'a>(dates: impl Iterator<Item = &'a NaiveDate>) -> Vec<String> {
    dates.map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

/// Date, min, max and humidity columns of normalized rows, the input of the
/// monthly aggregation.
pub fn rows_to_frame(rows: &[ObservationRow]) -> Result<DataFrame, FrameError> {
    Ok(DataFrame::new(vec![
        Column::new(COL_DATE.into(), date_strings(rows.iter().map(|r| &r.date))),
        Column::new(
            COL_TEMPERATURE_MIN.into(),
            rows.iter().map(|r| r.temperature_min).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_TEMPERATURE_MAX.into(),
            rows.iter().map(|r| r.temperature_max).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HUMIDITY.into(),
            rows.iter().map(|r| r.humidity).collect::<Vec<_>>(),
        ),
    ])?)
}

pub fn cleaned_series_to_frame(series: &[CleanedObservation]) -> Result<DataFrame, FrameError> {
    Ok(DataFrame::new(vec![
        Column::new(COL_DATE.into(), date_strings(series.iter().map(|r| &r.date))),
        Column::new(
            COL_TIME.into(),
            series
                .iter()
                .map(|r| r.time.format("%H:%M").to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_TEMPERATURE.into(),
            series.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HUMIDITY.into(),
            series.iter().map(|r| r.humidity).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_PRECIPITATION.into(),
            series.iter().map(|r| r.precipitation).collect::<Vec<_>>(),
        ),
    ])?)
}

pub fn frame_to_cleaned_series(df: &DataFrame) -> Result<Vec<CleanedObservation>, FrameError> {
    let dates = date_values(df, COL_DATE)?;
    let times = text_values(df, COL_TIME)?;
    let temperatures = float_values(df, COL_TEMPERATURE)?;
    let humidities = float_values(df, COL_HUMIDITY)?;
    let precipitation = match df.column(COL_PRECIPITATION) {
        Ok(_) => float_values(df, COL_PRECIPITATION)?,
        Err(_) => vec![None; df.height()],
    };

    let mut series = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let time_text = times[i].clone().unwrap_or_default();
        let time = NaiveTime::parse_from_str(time_text.trim(), "%H:%M").map_err(|_| {
            FrameError::InvalidValue {
                column: COL_TIME.to_string(),
                value: time_text.clone(),
            }
        })?;
        let (Some(temperature), Some(humidity)) = (temperatures[i], humidities[i]) else {
            continue;
        };
        series.push(CleanedObservation {
            date: dates[i],
            time,
            temperature,
            humidity,
            precipitation: precipitation[i],
        });
    }
    Ok(series)
}

pub fn aggregates_to_frame(rows: &[DailyAggregate]) -> Result<DataFrame, FrameError> {
    Ok(DataFrame::new(vec![
        Column::new(COL_DATE.into(), date_strings(rows.iter().map(|r| &r.date))),
        Column::new(
            COL_TEMPERATURE_MIN.into(),
            rows.iter().map(|r| r.temperature_min).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_TEMPERATURE_MAX.into(),
            rows.iter().map(|r| r.temperature_max).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HUMIDITY.into(),
            rows.iter().map(|r| r.humidity_mean).collect::<Vec<_>>(),
        ),
    ])?)
}

/// Reads the date, min, max and humidity columns. Extra columns are ignored.
pub fn frame_to_aggregates(df: &DataFrame) -> Result<Vec<DailyAggregate>, FrameError> {
    let dates = date_values(df, COL_DATE)?;
    let minimums = float_values(df, COL_TEMPERATURE_MIN)?;
    let maximums = float_values(df, COL_TEMPERATURE_MAX)?;
    let humidities = float_values(df, COL_HUMIDITY)?;

    Ok(dates
        .into_iter()
        .zip(minimums)
        .zip(maximums)
        .zip(humidities)
        .map(
            |(((date, temperature_min), temperature_max), humidity_mean)| DailyAggregate {
                date,
                temperature_min,
                temperature_max,
                humidity_mean,
            },
        )
        .collect())
}

pub fn degree_days_to_frame(rows: &[DegreeDay]) -> Result<DataFrame, FrameError> {
    let mut df = aggregates_to_frame(&rows.iter().map(DegreeDay::aggregate).collect::<Vec<_>>())?;
    df.with_column(Column::new(
        COL_GDD.into(),
        rows.iter().map(|r| r.gdd).collect::<Vec<_>>(),
    ))?;
    df.with_column(Column::new(
        COL_GDD_CUMULATIVE.into(),
        rows.iter().map(|r| r.gdd_cumulative).collect::<Vec<_>>(),
    ))?;
    Ok(df)
}

/// Reads a degree-day table back. A missing cumulative cell is treated as
/// the previous day's total.
pub fn frame_to_degree_days(df: &DataFrame) -> Result<Vec<DegreeDay>, FrameError> {
    let aggregates = frame_to_aggregates(df)?;
    let gdd = float_values(df, COL_GDD)?;
    let cumulative = float_values(df, COL_GDD_CUMULATIVE)?;

    let mut running = 0.0;
    Ok(aggregates
        .into_iter()
        .zip(gdd)
        .zip(cumulative)
        .map(|((aggregate, gdd), cumulative)| {
            running = cumulative.unwrap_or(running);
            DegreeDay {
                date: aggregate.date,
                temperature_min: aggregate.temperature_min,
                temperature_max: aggregate.temperature_max,
                humidity_mean: aggregate.humidity_mean,
                gdd,
                gdd_cumulative: running,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, min: Option<f64>, max: Option<f64>) -> DegreeDay {
        DegreeDay {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            temperature_min: min,
            temperature_max: max,
            humidity_mean: Some(75.0),
            gdd: min.zip(max).map(|(a, b)| ((a + b) / 2.0 - 10.0).max(0.0)),
            gdd_cumulative: d as f64,
        }
    }

    #[test]
    fn test_degree_day_frame_has_report_columns() {
        let rows = vec![day(1, Some(5.0), Some(15.0)), day(2, None, Some(18.0))];
        let df = degree_days_to_frame(&rows).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                COL_DATE,
                COL_TEMPERATURE_MIN,
                COL_TEMPERATURE_MAX,
                COL_HUMIDITY,
                COL_GDD,
                COL_GDD_CUMULATIVE
            ]
        );
        assert_eq!(frame_to_degree_days(&df).unwrap(), rows);
    }

    #[test]
    fn test_cleaned_series_frame() {
        let series = vec![CleanedObservation {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            temperature: 6.1,
            humidity: 88.0,
            precipitation: Some(0.2),
        }];
        let df = cleaned_series_to_frame(&series).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(frame_to_cleaned_series(&df).unwrap(), series);
    }
}
