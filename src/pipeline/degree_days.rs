use crate::types::daily_aggregate::{DailyAggregate, DegreeDay};

/// Growing degree days of one day: `max(0, (min + max) / 2 - base)`.
pub fn growing_degree_days(temperature_min: f64, temperature_max: f64, base: f64) -> f64 {
    ((temperature_min + temperature_max) / 2.0 - base).max(0.0)
}

/// Adds GDD and its running total to each day, in date order.
///
/// A day missing its minimum or maximum gets no GDD and carries the previous
/// total forward.
pub fn degree_days(aggregates: &[DailyAggregate], base_temperature: f64) -> Vec<DegreeDay> {
    let mut days = aggregates.to_vec();
    days.sort_by_key(|day| day.date);

    let mut cumulative = 0.0;
    days.into_iter()
        .map(|day| {
            let gdd = day
                .temperature_min
                .zip(day.temperature_max)
                .map(|(min, max)| growing_degree_days(min, max, base_temperature));
            cumulative += gdd.unwrap_or(0.0);
            DegreeDay {
                date: day.date,
                temperature_min: day.temperature_min,
                temperature_max: day.temperature_max,
                humidity_mean: day.humidity_mean,
                gdd,
                gdd_cumulative: cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn aggregate(day: u32, min: Option<f64>, max: Option<f64>) -> DailyAggregate {
        DailyAggregate {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            temperature_min: min,
            temperature_max: max,
            humidity_mean: None,
        }
    }

    #[test]
    fn test_growing_degree_days() {
        assert_eq!(growing_degree_days(5.0, 15.0, 10.0), 0.0);
        assert_eq!(growing_degree_days(15.0, 25.0, 10.0), 10.0);
        assert_eq!(growing_degree_days(-5.0, 3.0, 10.0), 0.0);
    }

    #[test]
    fn test_cumulative_in_date_order() {
        let days = degree_days(
            &[
                aggregate(3, Some(12.0), Some(22.0)),
                aggregate(1, Some(15.0), Some(25.0)),
                aggregate(2, Some(5.0), Some(15.0)),
            ],
            10.0,
        );
        let cumulative: Vec<f64> = days.iter().map(|d| d.gdd_cumulative).collect();
        assert_eq!(cumulative, vec![10.0, 10.0, 17.0]);
    }

    #[test]
    fn test_missing_extreme_gives_null_gdd_and_keeps_total() {
        let days = degree_days(
            &[
                aggregate(1, Some(15.0), Some(25.0)),
                aggregate(2, None, Some(30.0)),
                aggregate(3, Some(14.0), Some(16.0)),
            ],
            10.0,
        );
        assert_eq!(days[1].gdd, None);
        assert_eq!(days[1].gdd_cumulative, 10.0);
        assert_eq!(days[2].gdd_cumulative, 15.0);
        assert!(days
            .windows(2)
            .all(|w| w[0].gdd_cumulative <= w[1].gdd_cumulative));
    }

    #[test]
    fn test_custom_base() {
        let days = degree_days(&[aggregate(1, Some(6.0), Some(14.0))], 6.0);
        assert_eq!(days[0].gdd, Some(4.0));
    }
}
