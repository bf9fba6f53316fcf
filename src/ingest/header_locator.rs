//! Header row detection.
//!
//! The header row is the first row that holds both anchor labels (employee
//! code and employee name). Titles, company names and blank rows above it
//! are ignored.

use tracing::{debug, warn};

use crate::config::AliasCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{CanonicalField, RawGrid};
use crate::normalize::normalize_text;

/// Returns the index of the header row.
///
/// Only the first `scan_limit` rows are searched. A row holding both anchors
/// wins; when no row does, the first row holding one of them is returned so
/// that the column mapper can report which anchor is missing.
///
/// # Errors
///
/// Returns [`EngineError::HeaderNotFound`] when no anchor label appears in
/// the scanned rows.
///
/// # Examples
///
/// ```
/// use payroll_ingest::config::AliasCatalog;
/// use payroll_ingest::ingest::locate_header;
/// use payroll_ingest::models::RawGrid;
///
/// let catalog = AliasCatalog::builtin().unwrap();
/// let grid = RawGrid::from_text(vec![
///     vec!["BẢNG LƯƠNG THÁNG 10/2024", ""],
///     vec!["MSNV", "HỌ VÀ TÊN"],
///     vec!["E001", "Nguyễn Văn A"],
/// ]);
/// assert_eq!(locate_header(&grid, &catalog, 50).unwrap(), 1);
/// ```
pub fn locate_header(grid: &RawGrid, catalog: &AliasCatalog, scan_limit: usize) -> EngineResult<usize> {
    let scanned_rows = grid.height().min(scan_limit);
    let mut partial = None;

    for (index, row) in grid.rows().take(scanned_rows).enumerate() {
        if grid.is_row_blank(index) {
            continue;
        }
        let mut has_code = false;
        let mut has_name = false;
        for cell in row {
            let normalized = normalize_text(cell.text());
            has_code |= catalog.matches(CanonicalField::EmployeeCode, &normalized);
            has_name |= catalog.matches(CanonicalField::EmployeeName, &normalized);
        }

        if has_code && has_name {
            debug!(row = index, "Located header row");
            return Ok(index);
        }
        if (has_code || has_name) && partial.is_none() {
            partial = Some(index);
        }
    }

    match partial {
        Some(index) => {
            warn!(row = index, "Header row holds only one anchor column");
            Ok(index)
        }
        None => Err(EngineError::HeaderNotFound { scanned_rows }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AliasCatalog {
        AliasCatalog::builtin().unwrap()
    }

    fn grid_with_leading_blank_rows(blank_rows: usize) -> RawGrid {
        let mut rows: Vec<Vec<&str>> = vec![vec!["", "", ""]; blank_rows];
        rows.push(vec!["STT", "MSNV", "HỌ VÀ TÊN"]);
        rows.push(vec!["1", "E001", "Nguyễn Văn A"]);
        RawGrid::from_text(rows)
    }

    #[test]
    fn test_header_found_after_leading_blank_rows() {
        for blank_rows in [0, 1, 5] {
            let grid = grid_with_leading_blank_rows(blank_rows);
            assert_eq!(
                locate_header(&grid, &catalog(), 50).unwrap(),
                blank_rows,
                "with {blank_rows} blank rows"
            );
        }
    }

    #[test]
    fn test_header_labels_are_matched_loosely() {
        let grid = RawGrid::from_text(vec![vec!["Mã  NV", "họ và tên"]]);
        assert_eq!(locate_header(&grid, &catalog(), 50).unwrap(), 0);
    }

    #[test]
    fn test_row_with_both_anchors_beats_earlier_partial_row() {
        let grid = RawGrid::from_text(vec![
            vec!["MSNV", ""],
            vec!["MSNV", "HỌ TÊN"],
        ]);
        assert_eq!(locate_header(&grid, &catalog(), 50).unwrap(), 1);
    }

    #[test]
    fn test_partial_header_is_returned_when_no_row_has_both() {
        let grid = RawGrid::from_text(vec![vec!["Công ty ABC", ""], vec!["MSNV", "TÊN"]]);
        assert_eq!(locate_header(&grid, &catalog(), 50).unwrap(), 1);
    }

    #[test]
    fn test_header_beyond_scan_limit_is_not_found() {
        let grid = grid_with_leading_blank_rows(5);
        let result = locate_header(&grid, &catalog(), 3);
        assert!(matches!(
            result,
            Err(EngineError::HeaderNotFound { scanned_rows: 3 })
        ));
    }

    #[test]
    fn test_grid_without_anchors_is_rejected() {
        let grid = RawGrid::from_text(vec![vec!["A", "B"], vec!["1", "2"]]);
        assert!(matches!(
            locate_header(&grid, &catalog(), 50),
            Err(EngineError::HeaderNotFound { scanned_rows: 2 })
        ));
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid = RawGrid::new(Vec::new());
        assert!(matches!(
            locate_header(&grid, &catalog(), 50),
            Err(EngineError::HeaderNotFound { scanned_rows: 0 })
        ));
    }
}
