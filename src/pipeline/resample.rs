use crate::config::PipelineOptions;
use crate::pipeline::interpolate::interpolate_linear;
use crate::types::observation::{CleanedObservation, CleanedSeries, ObservationRow};
use chrono::{NaiveDate, NaiveTime, Timelike};
use log::debug;

struct TimedRow {
    date: NaiveDate,
    time: NaiveTime,
    temperature: Option<f64>,
    humidity: Option<f64>,
    precipitation: Option<f64>,
}

/// Turns normalized rows into a synoptic series sorted and unique by
/// `(date, time)`.
///
/// Rows with a missing or unparseable time are dropped first. With
/// `bucket_to_3h` each time is floored to its 3 hour boundary and only the
/// configured synoptic hours are kept. When several rows share a slot they
/// collapse into one, each column taking the first non-null value in time
/// order. Remaining temperature and humidity gaps are
/// interpolated when enabled, and rows still missing either are dropped.
pub fn clean_daily(rows: &[ObservationRow], options: &PipelineOptions) -> CleanedSeries {
    let mut timed: Vec<TimedRow> = rows
        .iter()
        .filter_map(|row| {
            let time = NaiveTime::parse_from_str(row.time.as_deref()?.trim(), "%H:%M").ok()?;
            Some(TimedRow {
                date: row.date,
                time,
                temperature: row.temperature,
                humidity: row.humidity,
                precipitation: row.precipitation,
            })
        })
        .collect();
    timed.sort_by_key(|row| (row.date, row.time));

    if options.bucket_to_3h {
        let synoptic = options.synoptic_times();
        timed = timed
            .into_iter()
            .map(|row| TimedRow {
                time: floor_to_3h(row.time),
                ..row
            })
            .filter(|row| synoptic.contains(&row.time))
            .collect();
    }
    timed.dedup_by(|later, kept| {
        if (later.date, later.time) != (kept.date, kept.time) {
            return false;
        }
        kept.temperature = kept.temperature.or(later.temperature);
        kept.humidity = kept.humidity.or(later.humidity);
        kept.precipitation = kept.precipitation.or(later.precipitation);
        true
    });

    let mut temperatures: Vec<Option<f64>> = timed.iter().map(|r| r.temperature).collect();
    let mut humidities: Vec<Option<f64>> = timed.iter().map(|r| r.humidity).collect();
    if options.interpolate {
        interpolate_linear(&mut temperatures);
        interpolate_linear(&mut humidities);
    }

    let slots = timed.len();
    let series: CleanedSeries = timed
        .into_iter()
        .zip(temperatures.into_iter().zip(humidities))
        .filter_map(|(row, (temperature, humidity))| {
            Some(CleanedObservation {
                date: row.date,
                time: row.time,
                temperature: temperature?,
                humidity: humidity?,
                precipitation: row.precipitation,
            })
        })
        .collect();

    debug!(
        "Cleaned {} rows into {} synoptic readings ({} slots before dropping gaps)",
        rows.len(),
        series.len(),
        slots
    );
    series
}

fn floor_to_3h(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour() - time.hour() % 3, 0, 0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, time: Option<&str>, temperature: Option<f64>, humidity: Option<f64>) -> ObservationRow {
        ObservationRow {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            time: time.map(str::to_string),
            temperature,
            temperature_min: None,
            temperature_max: None,
            humidity,
            precipitation: None,
        }
    }

    fn hhmm(series: &CleanedSeries) -> Vec<String> {
        series
            .iter()
            .map(|r| r.time.format("%H:%M").to_string())
            .collect()
    }

    #[test]
    fn test_sorted_and_unique_by_date_and_time() {
        let rows = vec![
            row(1, Some("06:00"), Some(6.0), Some(80.0)),
            row(1, Some("00:00"), Some(4.0), Some(90.0)),
            row(1, Some("07:30"), Some(7.0), Some(75.0)),
            row(1, Some("03:00"), Some(5.0), Some(85.0)),
        ];
        let series = clean_daily(&rows, &PipelineOptions::default());

        // 07:30 floors onto the 06:00 slot, which the 06:00 reading already holds.
        assert_eq!(hhmm(&series), vec!["00:00", "03:00", "06:00"]);
        assert_eq!(series[2].temperature, 6.0);
        assert!(series
            .windows(2)
            .all(|w| (w[0].date, w[0].time) < (w[1].date, w[1].time)));
    }

    #[test]
    fn test_floor_and_synoptic_filter() {
        let rows = vec![
            row(1, Some("22:00"), Some(2.0), Some(90.0)),
            row(1, Some("23:00"), Some(1.0), Some(95.0)),
            row(1, Some("13:40"), Some(12.0), Some(60.0)),
        ];
        let series = clean_daily(&rows, &PipelineOptions::default());
        // 23:00 floors to 21:00; 22:00 is itself a synoptic hour but floors to 21:00 first.
        assert_eq!(hhmm(&series), vec!["12:00", "21:00"]);
        assert_eq!(series[1].temperature, 2.0);
    }

    #[test]
    fn test_slot_fills_missing_values_from_later_rows() {
        let rows = vec![
            row(1, Some("18:00"), Some(9.0), Some(70.0)),
            row(1, Some("21:00"), None, Some(80.0)),
            row(1, Some("22:00"), Some(7.0), Some(85.0)),
        ];
        let series = clean_daily(&rows, &PipelineOptions::default());

        assert_eq!(hhmm(&series), vec!["18:00", "21:00"]);
        assert_eq!(series[1].temperature, 7.0);
        assert_eq!(series[1].humidity, 80.0);
    }

    #[test]
    fn test_pass_through_without_bucketing() {
        let options = PipelineOptions {
            bucket_to_3h: false,
            ..PipelineOptions::default()
        };
        let rows = vec![
            row(1, Some("13:40"), Some(12.0), Some(60.0)),
            row(1, Some("13:40"), Some(13.0), Some(61.0)),
        ];
        let series = clean_daily(&rows, &options);
        assert_eq!(hhmm(&series), vec!["13:40"]);
        assert_eq!(series[0].temperature, 12.0);
    }

    #[test]
    fn test_null_or_bad_time_never_reaches_series() {
        let rows = vec![
            row(1, None, Some(1.0), Some(50.0)),
            row(1, Some("xx:yy"), Some(1.0), Some(50.0)),
            row(1, Some("09:00"), Some(8.0), Some(70.0)),
        ];
        let series = clean_daily(&rows, &PipelineOptions::default());
        assert_eq!(hhmm(&series), vec!["09:00"]);
    }

    #[test]
    fn test_interpolates_interior_and_drops_edges() {
        let rows = vec![
            row(1, Some("00:00"), None, Some(90.0)),
            row(1, Some("03:00"), Some(10.0), Some(90.0)),
            row(1, Some("06:00"), None, None),
            row(1, Some("09:00"), None, Some(70.0)),
            row(1, Some("12:00"), Some(40.0), Some(60.0)),
        ];
        let series = clean_daily(&rows, &PipelineOptions::default());

        assert_eq!(hhmm(&series), vec!["03:00", "06:00", "09:00", "12:00"]);
        let temperatures: Vec<f64> = series.iter().map(|r| r.temperature).collect();
        assert_eq!(temperatures, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(series[1].humidity, 80.0);
    }

    #[test]
    fn test_without_interpolation_gaps_are_dropped() {
        let options = PipelineOptions {
            interpolate: false,
            ..PipelineOptions::default()
        };
        let rows = vec![
            row(1, Some("00:00"), Some(1.0), Some(90.0)),
            row(1, Some("03:00"), None, Some(90.0)),
            row(1, Some("06:00"), Some(3.0), Some(90.0)),
        ];
        assert_eq!(hhmm(&clean_daily(&rows, &options)), vec!["00:00", "06:00"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(clean_daily(&[], &PipelineOptions::default()).is_empty());
    }
}
