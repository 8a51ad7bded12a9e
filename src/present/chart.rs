//! Line charts rendered to SVG with plotters, available with the `charts`
//! feature.

use crate::present::{ExportError, OutputLayout};
use crate::types::daily_aggregate::DegreeDay;
use crate::types::report::DailyReport;
use std::path::Path;

#[cfg(feature = "charts")]
mod render {
    use super::*;
    use plotters::prelude::*;
    use std::ops::Range;

    const SIZE: (u32, u32) = (1000, 500);

    fn chart_error<E: std::fmt::Display>(e: E) -> ExportError {
        ExportError::Chart(e.to_string())
    }

    /// Value range of `values` with a little headroom, never empty.
    fn padded_range(values: impl Iterator<Item = f64>, floor_at_zero: bool) -> Range<f64> {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return 0.0..1.0;
        }
        let pad = ((max - min) * 0.1).max(1.0);
        let low = if floor_at_zero { 0.0 } else { min - pad };
        low..max + pad
    }

    pub fn daily_svg(report: &DailyReport) -> Result<String, ExportError> {
        let labels: Vec<String> = report
            .series
            .iter()
            .map(|r| r.time.format("%H:%M").to_string())
            .collect();
        let count = labels.len().max(1);
        let title = format!(
            "Évolution de la température et de l'humidité - {} ({})",
            report.station,
            report.date.format("%Y-%m-%d")
        );

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, ("sans-serif", 20))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .right_y_label_area_size(50)
                .build_cartesian_2d(
                    0..count,
                    padded_range(report.series.iter().map(|r| r.temperature), false),
                )
                .map_err(chart_error)?
                .set_secondary_coord(
                    0..count,
                    padded_range(report.series.iter().map(|r| r.humidity), false),
                );

            let format_label = |i: &usize| labels.get(*i).cloned().unwrap_or_default();
            chart
                .configure_mesh()
                .x_labels(count)
                .x_label_formatter(&format_label)
                .x_desc("Heure")
                .y_desc("Température (°C)")
                .draw()
                .map_err(chart_error)?;
            chart
                .configure_secondary_axes()
                .y_desc("Humidité (%)")
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(LineSeries::new(
                    report.series.iter().enumerate().map(|(i, r)| (i, r.temperature)),
                    RED.stroke_width(2),
                ))
                .map_err(chart_error)?
                .label("Température (°C)")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
            chart
                .draw_secondary_series(LineSeries::new(
                    report.series.iter().enumerate().map(|(i, r)| (i, r.humidity)),
                    BLUE.stroke_width(2),
                ))
                .map_err(chart_error)?
                .label("Humidité (%)")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(chart_error)?;
            root.present().map_err(chart_error)?;
        }
        Ok(svg)
    }

    pub fn gdd_svg(station: &str, rows: &[DegreeDay]) -> Result<String, ExportError> {
        let labels: Vec<String> = rows
            .iter()
            .map(|r| r.date.format("%d/%m").to_string())
            .collect();
        let count = labels.len().max(1);
        let title = format!("GDD cumulés - {}", station);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, ("sans-serif", 20))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(
                    0..count,
                    padded_range(rows.iter().map(|r| r.gdd_cumulative), true),
                )
                .map_err(chart_error)?;

            let format_label = |i: &usize| labels.get(*i).cloned().unwrap_or_default();
            chart
                .configure_mesh()
                .x_labels(count.min(16))
                .x_label_formatter(&format_label)
                .x_desc("Date")
                .y_desc("GDD cumulés")
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(LineSeries::new(
                    rows.iter().enumerate().map(|(i, r)| (i, r.gdd_cumulative)),
                    GREEN.stroke_width(2),
                ))
                .map_err(chart_error)?;
            chart
                .draw_series(
                    rows.iter()
                        .enumerate()
                        .map(|(i, r)| Circle::new((i, r.gdd_cumulative), 3, GREEN.filled())),
                )
                .map_err(chart_error)?;
            root.present().map_err(chart_error)?;
        }
        Ok(svg)
    }
}

#[cfg(not(feature = "charts"))]
mod render {
    use super::*;

    pub fn daily_svg(_report: &DailyReport) -> Result<String, ExportError> {
        Err(ExportError::ChartsDisabled)
    }

    pub fn gdd_svg(_station: &str, _rows: &[DegreeDay]) -> Result<String, ExportError> {
        Err(ExportError::ChartsDisabled)
    }
}

pub use render::{daily_svg, gdd_svg};

fn write_svg(svg: &str, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        OutputLayout::ensure_dir(parent)?;
    }
    std::fs::write(path, svg).map_err(|e| ExportError::Write(path.to_path_buf(), e))
}

/// Writes the temperature and humidity chart of a daily report.
pub fn write_daily_chart(report: &DailyReport, path: &Path) -> Result<(), ExportError> {
    write_svg(&daily_svg(report)?, path)
}

/// Writes the cumulative GDD chart of a month.
pub fn write_gdd_chart(station: &str, rows: &[DegreeDay], path: &Path) -> Result<(), ExportError> {
    write_svg(&gdd_svg(station, rows)?, path)
}
