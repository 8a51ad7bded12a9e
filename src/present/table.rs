//! Plain-text tables printed by the command line.

use crate::types::observation::CleanedObservation;
use crate::types::report::{DailyReport, MonthlyReport};
use chrono::NaiveDateTime;
use std::fmt::Write;

const RULE: &str = "|----------------------------------------------|";

/// One decimal with a decimal comma, `N/A` for a missing value.
pub fn decimal_comma(value: Option<f64>) -> String {
    value.map_or_else(
        || "N/A".to_string(),
        |v| format!("{v:.1}").replace('.', ","),
    )
}

pub fn welcome_banner(now: NaiveDateTime) -> String {
    format!(
        "\n{RULE}\n| {:<44} |\n| {:<44} |\n{RULE}",
        "Welcome to Weather History Viewer",
        format!(
            "Today is {}. It is {}",
            now.format("%Y-%m-%d"),
            now.format("%H:%M")
        ),
    )
}

/// Banner, one row per reading, and a min/max summary.
pub fn daily_table(report: &DailyReport, now: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "| {:<44} |", format!("Weather station: {}", report.station));
    let _ = writeln!(
        out,
        "| {:<44} |",
        format!(
            "Today is the {}. It's {}",
            report.date.format("%Y-%m-%d"),
            now.format("%H:%M")
        )
    );
    let _ = writeln!(
        out,
        "| {:<44} |",
        format!("Chosen month: {}", report.date.format("%B %Y"))
    );
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| {:<10} | {:<5} | {:^7} | {:^13} |", "Day", "Heure", "T(°C)", "Humidité(%)");
    let _ = writeln!(out, "{RULE}");
    for row in &report.series {
        let _ = writeln!(
            out,
            "| {} | {} | {:^7} | {:^13} |",
            row.date.format("%Y-%m-%d"),
            row.time.format("%H:%M"),
            decimal_comma(Some(row.temperature)),
            decimal_comma(Some(row.humidity)),
        );
    }
    let _ = writeln!(out, "{RULE}");
    out.push_str(&daily_summary(&report.series));
    out
}

pub fn daily_summary(series: &[CleanedObservation]) -> String {
    let extremes = |values: Vec<f64>| {
        let max = values.iter().copied().reduce(f64::max);
        let min = values.iter().copied().reduce(f64::min);
        (max, min)
    };
    let (t_max, t_min) = extremes(series.iter().map(|r| r.temperature).collect());
    let (h_max, h_min) = extremes(series.iter().map(|r| r.humidity).collect());

    format!(
        "\nRésumé des valeurs maximales et minimales :\n\
         Température max : {} °C\n\
         Température min : {} °C\n\
         Humidité max : {} %\n\
         Humidité min : {} %\n",
        decimal_comma(t_max),
        decimal_comma(t_min),
        decimal_comma(h_max),
        decimal_comma(h_min),
    )
}

pub fn monthly_table(report: &MonthlyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nRapport météo - {} ({}/{}), base {} °C",
        report.station,
        report.month.month(),
        report.month.year(),
        decimal_comma(Some(report.base_temperature))
    );
    let _ = writeln!(
        out,
        "| {:<10} | {:^7} | {:^7} | {:^11} | {:^6} | {:^11} |",
        "Date", "T min", "T max", "Humidité(%)", "GDD", "GDD cumulés"
    );
    for day in &report.series {
        let _ = writeln!(
            out,
            "| {} | {:^7} | {:^7} | {:^11} | {:^6} | {:^11} |",
            day.date.format("%Y-%m-%d"),
            decimal_comma(day.temperature_min),
            decimal_comma(day.temperature_max),
            decimal_comma(day.humidity_mean),
            decimal_comma(day.gdd),
            decimal_comma(Some(day.gdd_cumulative)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn report() -> DailyReport {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        DailyReport {
            station: "ROUEN-BOOS".to_string(),
            date,
            empty_reason: None,
            truncated: false,
            series: vec![
                CleanedObservation {
                    date,
                    time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                    temperature: 3.25,
                    humidity: 95.0,
                    precipitation: None,
                },
                CleanedObservation {
                    date,
                    time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    temperature: 11.0,
                    humidity: 61.5,
                    precipitation: None,
                },
            ],
        }
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(decimal_comma(Some(4.36)), "4,4");
        assert_eq!(decimal_comma(None), "N/A");
    }

    #[test]
    fn test_daily_table_lists_rows_and_summary() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let table = daily_table(&report(), now);

        assert!(table.contains("Weather station: ROUEN-BOOS"));
        assert!(table.contains("Chosen month: March 2024"));
        assert!(table.contains("| 2024-03-01 | 12:00 |  11,0   |"));
        assert!(table.contains("Température max : 11,0 °C"));
        assert!(table.contains("Humidité min : 61,5 %"));
    }

    #[test]
    fn test_summary_of_empty_series() {
        assert!(daily_summary(&[]).contains("Température max : N/A °C"));
    }
}
