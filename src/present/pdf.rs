//! A small PDF 1.4 writer for the monthly report.
//!
//! Pages are A4 and use the standard Helvetica fonts with WinAnsi encoding,
//! so no font data is embedded. Characters outside that encoding are written
//! as `?`.

use crate::types::daily_aggregate::DegreeDay;
use crate::types::period::Month;

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 50.0;
const LINE_HEIGHT: f64 = 14.0;
const BODY_SIZE: f64 = 10.0;
const TITLE_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Accumulates page content streams and serializes them into a document.
#[derive(Debug, Default)]
pub struct PdfDocument {
    pages: Vec<Vec<u8>>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn new_page(&mut self) -> &mut Vec<u8> {
        self.pages.push(Vec::new());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Writes a title followed by text lines, starting new pages as needed.
    pub fn add_text_pages(&mut self, title: &str, lines: &[String]) {
        let mut page = self.new_page();
        let mut y = PAGE_HEIGHT - MARGIN;
        text(page, Font::Bold, TITLE_SIZE, MARGIN, y, title);
        y -= LINE_HEIGHT * 2.0;

        for line in lines {
            if y < MARGIN {
                page = self.new_page();
                y = PAGE_HEIGHT - MARGIN;
            }
            text(page, Font::Regular, BODY_SIZE, MARGIN, y, line);
            y -= LINE_HEIGHT;
        }
    }

    /// Adds a page with a line chart of `(label, value)` points.
    ///
    /// The vertical axis starts at zero. Only the first and last labels are
    /// printed under the horizontal axis.
    pub fn add_line_chart_page(&mut self, title: &str, points: &[(String, f64)]) {
        let page = self.new_page();
        text(
            page,
            Font::Bold,
            TITLE_SIZE,
            MARGIN,
            PAGE_HEIGHT - MARGIN,
            title,
        );

        let (left, right) = (MARGIN + 30.0, PAGE_WIDTH - MARGIN);
        let (bottom, top) = (PAGE_HEIGHT / 2.0 - 100.0, PAGE_HEIGHT - MARGIN - 60.0);

        push(page, "0 0 0 RG 0.8 w\n");
        push(page, &format!("{left:.2} {bottom:.2} m {right:.2} {bottom:.2} l S\n"));
        push(page, &format!("{left:.2} {bottom:.2} m {left:.2} {top:.2} l S\n"));

        if points.is_empty() {
            text(page, Font::Regular, BODY_SIZE, left + 10.0, (top + bottom) / 2.0, "Aucune donnée");
            return;
        }

        let max = points
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        let y_span = if max > 0.0 { max } else { 1.0 };
        let x_step = if points.len() > 1 {
            (right - left) / (points.len() - 1) as f64
        } else {
            0.0
        };
        let coordinates: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| {
                (
                    left + x_step * i as f64,
                    bottom + (v.max(0.0) / y_span) * (top - bottom),
                )
            })
            .collect();

        push(page, "0.2 0.4 0.8 RG 1.5 w\n");
        let mut path = String::new();
        for (i, (x, y)) in coordinates.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            path.push_str(&format!("{x:.2} {y:.2} {op} "));
        }
        if coordinates.len() == 1 {
            let (x, y) = coordinates[0];
            path.push_str(&format!("{:.2} {y:.2} l ", x + 1.0));
        }
        path.push_str("S\n");
        push(page, &path);

        text(page, Font::Regular, 8.0, MARGIN - 10.0, top - 3.0, &format!("{max:.1}"));
        text(page, Font::Regular, 8.0, MARGIN - 10.0, bottom - 3.0, "0");
        if let Some((first, _)) = points.first() {
            text(page, Font::Regular, 8.0, left, bottom - 14.0, first);
        }
        if points.len() > 1 {
            if let Some((last, _)) = points.last() {
                text(page, Font::Regular, 8.0, right - 45.0, bottom - 14.0, last);
            }
        }
    }

    /// Serializes the document.
    pub fn to_bytes(&self) -> Vec<u8> {
        let page_count = self.pages.len().max(1);
        // 1 catalog, 2 page tree, 3-4 fonts, then a page and a content object per page.
        let first_page_id = 5;
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", first_page_id + i * 2))
            .collect();

        let mut objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_count
            )
            .into_bytes(),
            font_object("Helvetica"),
            font_object("Helvetica-Bold"),
        ];

        let empty = Vec::new();
        for i in 0..page_count {
            let content = self.pages.get(i).unwrap_or(&empty);
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    first_page_id + i * 2 + 1
                )
                .into_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content);
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }

        let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(object);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );
        out
    }
}

fn font_object(base_font: &str) -> Vec<u8> {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
        .into_bytes()
}

fn push(page: &mut Vec<u8>, ops: &str) {
    page.extend_from_slice(ops.as_bytes());
}

fn text(page: &mut Vec<u8>, font: Font, size: f64, x: f64, y: f64, value: &str) {
    push(
        page,
        &format!("BT /{} {size:.1} Tf {x:.2} {y:.2} Td (", font.resource()),
    );
    page.extend_from_slice(&encode_text(value));
    push(page, ") Tj ET\n");
}

/// Encodes a string as an escaped WinAnsi literal string body.
fn encode_text(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len());
    for c in value.chars() {
        let byte = match c {
            '(' | ')' | '\\' => {
                bytes.push(b'\\');
                c as u8
            }
            '\n' | '\r' | '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        };
        bytes.push(byte);
    }
    bytes
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

/// Renders the monthly report: one line per day, then a chart of the
/// cumulative GDD.
pub fn monthly_report_pdf(station: &str, month: Month, rows: &[DegreeDay]) -> Vec<u8> {
    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{} - Temp Min: {}°C, Temp Max: {}°C, Humidité: {}%",
                row.date.format("%Y-%m-%d"),
                format_optional(row.temperature_min),
                format_optional(row.temperature_max),
                format_optional(row.humidity_mean),
            )
        })
        .collect();
    if let Some(last) = rows.last() {
        lines.push(String::new());
        lines.push(format!("GDD cumulés fin de mois : {:.1}", last.gdd_cumulative));
    }

    let mut document = PdfDocument::new();
    document.add_text_pages(
        &format!(
            "Rapport météo - {} ({}/{})",
            station,
            month.month(),
            month.year()
        ),
        &lines,
    );
    let points: Vec<(String, f64)> = rows
        .iter()
        .map(|row| (row.date.format("%Y-%m-%d").to_string(), row.gdd_cumulative))
        .collect();
    document.add_line_chart_page("Graphique des GDD cumulés", &points);
    document.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn rows(count: u32) -> Vec<DegreeDay> {
        (1..=count)
            .map(|d| DegreeDay {
                date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
                temperature_min: Some(9.0),
                temperature_max: Some(21.0),
                humidity_mean: Some(70.0),
                gdd: Some(5.0),
                gdd_cumulative: 5.0 * d as f64,
            })
            .collect()
    }

    #[test]
    fn test_document_structure() {
        let bytes = monthly_report_pdf("ROUEN-BOOS", Month::new(2024, 5).unwrap(), &rows(31));

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"/Count 2").is_some());
        assert!(find(&bytes, b"(Rapport m\xE9t\xE9o - ROUEN-BOOS \\(5/2024\\)) Tj").is_some());
        assert!(find(&bytes, b"Humidit\xE9: 70.0%").is_some());
        assert!(find(&bytes, b"(Graphique des GDD cumul\xE9s) Tj").is_some());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = monthly_report_pdf("X", Month::new(2024, 5).unwrap(), &rows(3));
        let startxref = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = std::str::from_utf8(&bytes[startxref..]).unwrap();
        let xref_offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_offset..].starts_with(b"xref\n"));

        let table = std::str::from_utf8(&bytes[xref_offset..startxref]).unwrap();
        for (id, entry) in table.lines().skip(3).take_while(|l| l.ends_with(" n ")).enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", id + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn test_long_reports_break_pages() {
        let lines: Vec<String> = (0..120).map(|i| format!("line {i}")).collect();
        let mut document = PdfDocument::new();
        document.add_text_pages("Title", &lines);
        assert!(document.page_count() >= 3);
    }

    #[test]
    fn test_encoding_escapes_and_replaces() {
        assert_eq!(encode_text("a(b)\\"), b"a\\(b\\)\\\\".to_vec());
        assert_eq!(encode_text("°é€✓"), vec![0xB0, 0xE9, 0x80, b'?']);
    }

    #[test]
    fn test_empty_chart_page() {
        let bytes = monthly_report_pdf("X", Month::new(2024, 5).unwrap(), &[]);
        assert!(find(&bytes, b"/Count 2").is_some());
        assert!(find(&bytes, b"(Aucune donn\xE9e) Tj").is_some());
    }
}
