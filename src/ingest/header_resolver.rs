//! Effective header labels and section groups per column.
//!
//! Multi-row merged headers often leave a column's label one row off from
//! the anchor row, and put section markers ("THU NHẬP", "KHẤU TRỪ") in a
//! merged cell above a run of columns. This pass settles both before any
//! alias matching happens.

use crate::config::SheetLayout;
use crate::models::{GroupLabel, RawGrid, Section};
use crate::normalize::{is_blank, normalize_text};

/// How many rows above the header are searched for section markers.
const GROUP_BAND_ROWS: usize = 2;

/// The label and section group of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    /// The effective header text, possibly blank.
    pub label: String,
    /// The section the column sits under.
    pub group: GroupLabel,
}

/// Resolves every column of the header row.
///
/// The effective label is the header cell, else the cell below it, else the
/// cell above it. The group comes from the closest marker row above the
/// header; see [`carry_group_labels`].
pub fn resolve_headers(grid: &RawGrid, header_row: usize, layout: &SheetLayout) -> Vec<ResolvedHeader> {
    let groups = carry_group_labels(grid, header_row, layout);

    groups
        .into_iter()
        .enumerate()
        .map(|(col, group)| ResolvedHeader {
            label: effective_label(grid, header_row, col).trim().to_string(),
            group,
        })
        .collect()
}

fn effective_label(grid: &RawGrid, header_row: usize, col: usize) -> &str {
    [
        Some(header_row),
        Some(header_row + 1),
        header_row.checked_sub(1),
    ]
    .into_iter()
    .flatten()
    .map(|row| grid.text(row, col))
    .find(|text| !is_blank(text))
    .unwrap_or("")
}

/// Computes the group label of each column.
///
/// Each band row above the header is walked left to right: a marker cell
/// opens its section, any other non-blank cell closes it, and blank cells
/// (the rest of a merged marker) keep it open. A column takes the section of
/// the closest band row that has one.
pub fn carry_group_labels(grid: &RawGrid, header_row: usize, layout: &SheetLayout) -> Vec<GroupLabel> {
    let bands: Vec<Vec<Option<Section>>> = (1..=GROUP_BAND_ROWS)
        .filter_map(|offset| header_row.checked_sub(offset))
        .map(|row| carry_band(grid, row, layout))
        .collect();

    (0..grid.width())
        .map(|col| {
            bands
                .iter()
                .find_map(|band| band.get(col).copied().flatten())
                .map_or(GroupLabel::Unlabeled, GroupLabel::from)
        })
        .collect()
}

fn carry_band(grid: &RawGrid, row: usize, layout: &SheetLayout) -> Vec<Option<Section>> {
    let mut current = None;
    (0..grid.width())
        .map(|col| {
            let text = grid.text(row, col);
            if !is_blank(text) {
                current = layout.marker(&normalize_text(text));
            }
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    fn layout() -> SheetLayout {
        ConfigLoader::builtin().unwrap().layout().clone()
    }

    fn labels(headers: &[ResolvedHeader]) -> Vec<&str> {
        headers.iter().map(|h| h.label.as_str()).collect()
    }

    fn groups(headers: &[ResolvedHeader]) -> Vec<GroupLabel> {
        headers.iter().map(|h| h.group).collect()
    }

    #[test]
    fn test_blank_header_cell_falls_back_to_row_below() {
        let grid = RawGrid::from_text(vec![
            vec!["MSNV", "HỌ VÀ TÊN", ""],
            vec!["", "", "LƯƠNG CB"],
            vec!["E001", "An", "5.000.000"],
        ]);
        let headers = resolve_headers(&grid, 0, &layout());
        assert_eq!(labels(&headers), vec!["MSNV", "HỌ VÀ TÊN", "LƯƠNG CB"]);
    }

    #[test]
    fn test_blank_header_cell_falls_back_to_row_above() {
        let grid = RawGrid::from_text(vec![
            vec!["", "", "THỰC LÃNH"],
            vec!["MSNV", "HỌ VÀ TÊN", ""],
            vec!["", "", ""],
            vec!["E001", "An", "7.000.000"],
        ]);
        let headers = resolve_headers(&grid, 1, &layout());
        assert_eq!(labels(&headers), vec!["MSNV", "HỌ VÀ TÊN", "THỰC LÃNH"]);
    }

    #[test]
    fn test_row_below_wins_over_row_above() {
        let grid = RawGrid::from_text(vec![
            vec!["", "", "ABOVE"],
            vec!["MSNV", "HỌ VÀ TÊN", " "],
            vec!["", "", "BELOW"],
        ]);
        let headers = resolve_headers(&grid, 1, &layout());
        assert_eq!(headers[2].label, "BELOW");
    }

    #[test]
    fn test_label_is_blank_when_all_candidates_are_blank() {
        let grid = RawGrid::from_text(vec![vec!["MSNV", "HỌ VÀ TÊN", ""]]);
        let headers = resolve_headers(&grid, 0, &layout());
        assert_eq!(headers[2].label, "");
        assert_eq!(headers[2].group, GroupLabel::Unlabeled);
    }

    #[test]
    fn test_marker_carries_across_merged_span() {
        let grid = RawGrid::from_text(vec![
            vec!["", "", "THU NHẬP", "", "KHẤU TRỪ", "", ""],
            vec!["MSNV", "HỌ VÀ TÊN", "PHỤ CẤP", "TIỀN ĂN", "BHXH", "TIỀN ĂN", "KHÁC"],
        ]);
        let headers = resolve_headers(&grid, 1, &layout());
        assert_eq!(
            groups(&headers),
            vec![
                GroupLabel::Unlabeled,
                GroupLabel::Unlabeled,
                GroupLabel::Income,
                GroupLabel::Income,
                GroupLabel::Deduction,
                GroupLabel::Deduction,
                GroupLabel::Deduction,
            ]
        );
    }

    #[test]
    fn test_other_label_breaks_the_section() {
        let grid = RawGrid::from_text(vec![
            vec!["KHẤU TRỪ", "", "THỰC LÃNH", ""],
            vec!["BHXH", "TIỀN ĂN", "MSNV", "HỌ VÀ TÊN"],
        ]);
        let headers = resolve_headers(&grid, 1, &layout());
        assert_eq!(
            groups(&headers),
            vec![
                GroupLabel::Deduction,
                GroupLabel::Deduction,
                GroupLabel::Unlabeled,
                GroupLabel::Unlabeled,
            ]
        );
    }

    #[test]
    fn test_closest_band_row_wins() {
        let grid = RawGrid::from_text(vec![
            vec!["", "THU NHẬP", "", ""],
            vec!["", "", "KHẤU TRỪ", ""],
            vec!["MSNV", "TIỀN ĂN", "TIỀN ĂN", "HỌ VÀ TÊN"],
        ]);
        let headers = resolve_headers(&grid, 2, &layout());
        assert_eq!(
            groups(&headers),
            vec![
                GroupLabel::Unlabeled,
                GroupLabel::Income,
                GroupLabel::Deduction,
                GroupLabel::Deduction,
            ]
        );
    }

    #[test]
    fn test_marker_three_rows_above_is_ignored() {
        let grid = RawGrid::from_text(vec![
            vec!["KHẤU TRỪ", ""],
            vec!["", ""],
            vec!["", ""],
            vec!["MSNV", "HỌ VÀ TÊN"],
        ]);
        let labels = carry_group_labels(&grid, 3, &layout());
        assert_eq!(labels, vec![GroupLabel::Unlabeled, GroupLabel::Unlabeled]);
    }

    #[test]
    fn test_header_on_first_row_has_no_groups() {
        let grid = RawGrid::from_text(vec![vec!["MSNV", "HỌ VÀ TÊN"]]);
        let labels = carry_group_labels(&grid, 0, &layout());
        assert_eq!(labels, vec![GroupLabel::Unlabeled, GroupLabel::Unlabeled]);
    }
}
