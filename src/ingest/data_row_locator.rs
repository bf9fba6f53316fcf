//! First data row detection.

use tracing::debug;

use crate::config::AliasCatalog;
use crate::models::{CanonicalField, RawGrid};
use crate::normalize::{is_blank, normalize_text};

use super::column_mapper::ColumnMapping;

/// Returns the index of the first row holding employee data.
///
/// A row directly below the header that repeats the anchor labels (the
/// second line of a two-row header, or a copied header) is skipped. After
/// that, rows whose code and name cells are both blank are passed over.
/// Returns `None` for a sheet with a header and no data.
pub fn locate_first_data_row(
    grid: &RawGrid,
    header_row: usize,
    mapping: &ColumnMapping,
    catalog: &AliasCatalog,
) -> Option<usize> {
    let (code_column, name_column) = (mapping.code_column()?, mapping.name_column()?);

    let mut start = header_row + 1;
    if start < grid.height() && repeats_header(grid, start, code_column, name_column, catalog) {
        debug!(row = start, "Skipping repeated header row");
        start += 1;
    }

    let first = (start..grid.height()).find(|&row| {
        !is_blank(grid.text(row, code_column)) || !is_blank(grid.text(row, name_column))
    });
    debug!(first_data_row = ?first, "Located first data row");
    first
}

fn repeats_header(
    grid: &RawGrid,
    row: usize,
    code_column: usize,
    name_column: usize,
    catalog: &AliasCatalog,
) -> bool {
    let code = normalize_text(grid.text(row, code_column));
    let name = normalize_text(grid.text(row, name_column));
    catalog.matches(CanonicalField::EmployeeCode, &code)
        || catalog.matches(CanonicalField::EmployeeName, &name)
}
