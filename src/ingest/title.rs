//! Report title and period detection.
//!
//! Payroll sheets name their month in a banner above the header, in forms
//! like "BẢNG LƯƠNG THÁNG 10/2024", "Tháng 10 năm 2024" or "T10/2024".

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{SheetLayout, TitleConfig};
use crate::models::{RawGrid, ReportPeriod};
use crate::normalize::{is_blank, normalize_text};

fn period_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"\b(?:THANG|KY\s+LUONG|T)\s*(\d{1,2})\s+(?:NAM\s+)?(\d{4})\b").ok()
        })
        .as_ref()
}

/// Finds the reporting period named in a piece of text.
///
/// The month must be between 1 and 12; the first valid mention wins.
///
/// # Examples
///
/// ```
/// use payroll_ingest::ingest::parse_period;
/// use payroll_ingest::models::ReportPeriod;
///
/// assert_eq!(
///     parse_period("BẢNG LƯƠNG THÁNG 10/2024"),
///     Some(ReportPeriod { month: 10, year: 2024 })
/// );
/// assert_eq!(parse_period("Tháng 13 năm 2024"), None);
/// ```
pub fn parse_period(text: &str) -> Option<ReportPeriod> {
    let normalized = normalize_text(text);
    period_pattern()?
        .captures_iter(&normalized)
        .find_map(|captures| {
            let month: u32 = captures.get(1)?.as_str().parse().ok()?;
            let year: i32 = captures.get(2)?.as_str().parse().ok()?;
            (1..=12).contains(&month).then_some(ReportPeriod { month, year })
        })
}

/// Renders the configured title template for a period.
pub fn render_title(config: &TitleConfig, period: ReportPeriod) -> String {
    config
        .template
        .replace("{month}", &format!("{:02}", period.month))
        .replace("{year}", &period.year.to_string())
}

/// Derives the report title and period from the rows above the header.
///
/// A cell naming a period wins and yields the rendered template. Otherwise
/// the first non-blank cell above the header is used as is, and the
/// configured fallback covers sheets with nothing above the header. Section
/// markers are never taken as a title.
pub fn derive_title(
    grid: &RawGrid,
    header_row: usize,
    layout: &SheetLayout,
) -> (String, Option<ReportPeriod>) {
    let candidates: Vec<&str> = grid
        .rows()
        .take(header_row)
        .flat_map(|row| row.iter().map(|cell| cell.text().trim()))
        .filter(|text| !is_blank(text) && layout.marker(&normalize_text(text)).is_none())
        .collect();

    if let Some(period) = candidates.iter().find_map(|text| parse_period(text)) {
        return (render_title(layout.title(), period), Some(period));
    }

    let title = candidates
        .first()
        .map_or_else(|| layout.title().fallback.clone(), |text| text.to_string());
    (title, None)
}
