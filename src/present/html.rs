//! Server-rendered pages of the web front end.

use crate::present::table::decimal_comma;
use crate::present::{ChartKind, ExportFormat};
use crate::types::report::{DailyReport, MonthlyReport};
use std::fmt::Write;

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ border: 1px solid #999; padding: 0.2em 0.6em; text-align: right; }}\n\
         .error {{ color: #b00020; font-weight: bold; }}\n\
         </style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Rapport mensuel</a> | <a href=\"/daily\">Relevé journalier</a></nav>\n\
         <h1>{}</h1>\n{}\n</body>\n</html>\n",
        escape(title),
        escape(title),
        body
    )
}

fn error_banner(out: &mut String, error: Option<&str>) {
    if let Some(message) = error {
        let _ = writeln!(out, "<p class=\"error\">{}</p>", escape(message));
    }
}

/// Links to `/download/<format>/<key>` for each format.
fn download_links(out: &mut String, key: &str, formats: &[ExportFormat]) {
    out.push_str("<p>Télécharger :");
    for format in formats {
        let _ = write!(
            out,
            " <a href=\"{}\">{}</a>",
            escape(&format!("/download/{}/{}", format, key)),
            format.extension().to_uppercase()
        );
    }
    out.push_str("</p>\n");
}

/// Values echoed back into the monthly form.
#[derive(Debug, Clone, Default)]
pub struct MonthlyForm {
    pub station: String,
    pub year: String,
    pub month: String,
}

pub fn monthly_page(form: &MonthlyForm, report: Option<&MonthlyReport>, error: Option<&str>) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/\">\n\
         <label>Station <input name=\"station\" value=\"{}\" placeholder=\"ROUEN-BOOS\"></label>\n\
         <label>Année <input name=\"year\" value=\"{}\" size=\"4\"></label>\n\
         <label>Mois <input name=\"month\" value=\"{}\" size=\"2\"></label>\n\
         <button type=\"submit\">Afficher</button>\n</form>",
        escape(&form.station),
        escape(&form.year),
        escape(&form.month)
    );
    error_banner(&mut body, error);

    if let Some(report) = report.filter(|r| !r.series.is_empty()) {
        let _ = writeln!(
            body,
            "<h2>{} ({}/{})</h2>\n<table>\n<tr><th>Date</th><th>Température min (°C)</th>\
             <th>Température max (°C)</th><th>Humidité (%)</th><th>GDD</th><th>GDD cumulés</th></tr>",
            escape(&report.station),
            report.month.month(),
            report.month.year()
        );
        for day in &report.series {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                day.date.format("%Y-%m-%d"),
                decimal_comma(day.temperature_min),
                decimal_comma(day.temperature_max),
                decimal_comma(day.humidity_mean),
                decimal_comma(day.gdd),
                decimal_comma(Some(day.gdd_cumulative)),
            );
        }
        body.push_str("</table>\n");
        download_links(
            &mut body,
            &format!(
                "{}/{}/{}",
                report.station,
                report.month.year(),
                report.month.month()
            ),
            &[ExportFormat::Csv, ExportFormat::Json, ExportFormat::Pdf],
        );
        let _ = writeln!(
            body,
            "<p><a href=\"/static/{}\">Graphique des GDD cumulés</a></p>",
            ChartKind::MonthlyGdd.file_name()
        );
    }

    layout("Rapport météo mensuel", &body)
}

/// Values echoed back into the daily form.
#[derive(Debug, Clone, Default)]
pub struct DailyForm {
    pub station: String,
    pub date: String,
}

pub fn daily_page(form: &DailyForm, report: Option<&DailyReport>, error: Option<&str>) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/daily\">\n\
         <label>Station <input name=\"station\" value=\"{}\" placeholder=\"ROUEN-BOOS\"></label>\n\
         <label>Date <input name=\"date\" value=\"{}\" placeholder=\"YYYY-MM-DD\"></label>\n\
         <button type=\"submit\">Afficher</button>\n</form>",
        escape(&form.station),
        escape(&form.date)
    );
    error_banner(&mut body, error);

    if let Some(report) = report.filter(|r| !r.series.is_empty()) {
        let _ = writeln!(
            body,
            "<h2>{} ({})</h2>\n<table>\n<tr><th>Date</th><th>Heure</th>\
             <th>Température (°C)</th><th>Humidité (%)</th><th>Précipitations (mm)</th></tr>",
            escape(&report.station),
            report.date.format("%Y-%m-%d")
        );
        for row in &report.series {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.date.format("%Y-%m-%d"),
                row.time.format("%H:%M"),
                decimal_comma(Some(row.temperature)),
                decimal_comma(Some(row.humidity)),
                decimal_comma(row.precipitation),
            );
        }
        body.push_str("</table>\n");
        download_links(
            &mut body,
            &format!(
                "{}/{}",
                report.station,
                report.date.format("%Y-%m-%d")
            ),
            &[ExportFormat::Csv, ExportFormat::Json],
        );
        let _ = writeln!(
            body,
            "<p><a href=\"/static/{}\">Graphique température et humidité</a></p>",
            ChartKind::Daily.file_name()
        );
    }

    layout("Relevé météo journalier", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::daily_aggregate::DegreeDay;
    use crate::types::period::Month;
    use chrono::NaiveDate;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_monthly_page_with_report() {
        let report = MonthlyReport {
            station: "ROUEN-BOOS".to_string(),
            month: Month::new(2024, 5).unwrap(),
            base_temperature: 10.0,
            empty_reason: None,
            truncated: false,
            series: vec![DegreeDay {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                temperature_min: Some(15.0),
                temperature_max: Some(25.0),
                humidity_mean: Some(60.0),
                gdd: Some(10.0),
                gdd_cumulative: 10.0,
            }],
        };
        let html = monthly_page(&MonthlyForm::default(), Some(&report), None);

        assert!(html.contains("<td>2024-05-01</td><td>15,0</td><td>25,0</td>"));
        assert!(html.contains("href=\"/download/pdf/ROUEN-BOOS/2024/5\""));
        assert!(html.contains("/static/gdd_plot.svg"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_error_banner_is_escaped() {
        let form = DailyForm {
            station: "<X>".to_string(),
            date: String::new(),
        };
        let html = daily_page(&form, None, Some("Aucune donnée trouvée."));
        assert!(html.contains("<p class=\"error\">Aucune donnée trouvée.</p>"));
        assert!(html.contains("value=\"&lt;X&gt;\""));
        assert!(!html.contains("<table>"));
    }
}
