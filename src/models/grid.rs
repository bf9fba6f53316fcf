//! Raw spreadsheet grid.
//!
//! A [`RawGrid`] is the engine's only view of a sheet: rows of cells holding
//! text. It is padded to a rectangle on construction and never mutated
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::normalize::is_blank;

/// A single sheet cell.
///
/// `value` is the underlying cell content rendered as text. `display` is the
/// text the spreadsheet application shows, when the decoder can provide it;
/// it wins over `value` because locale-formatted numbers only read correctly
/// in their displayed form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The underlying value as text.
    pub value: String,
    /// The pre-rendered display text, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Cell {
    /// Creates a cell that only has an underlying value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: None,
        }
    }

    /// Creates a cell with both an underlying value and its display text.
    pub fn with_display(value: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: Some(display.into()),
        }
    }

    /// The text to read for ordinary fields: non-blank display text, else the value.
    pub fn text(&self) -> &str {
        match self.display.as_deref() {
            Some(display) if !is_blank(display) => display,
            _ => &self.value,
        }
    }

    /// The displayed text only; a blank display hides the underlying value.
    pub fn display_text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.value)
    }

    /// Returns true if the cell shows nothing.
    pub fn is_blank(&self) -> bool {
        is_blank(self.text())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// An immutable, rectangular grid of cells.
///
/// # Example
///
/// ```
/// use payroll_ingest::models::RawGrid;
///
/// let grid = RawGrid::from_text(vec![vec!["MSNV", "HỌ VÀ TÊN"], vec!["E001"]]);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.width(), 2);
/// assert_eq!(grid.text(1, 1), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl RawGrid {
    /// Builds a grid from rows of cells, padding short rows with blank cells.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize_with(width, Cell::default);
                row
            })
            .collect();
        Self { rows, width }
    }

    /// Builds a grid from rows of plain text.
    pub fn from_text<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::new).collect())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in every row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns true if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a row by index.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Returns a cell by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Returns the readable text at a position, or `""` outside the grid.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map_or("", Cell::text)
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns true if every cell of the row is blank (or the row does not exist).
    pub fn is_row_blank(&self, row: usize) -> bool {
        self.row(row)
            .is_none_or(|cells| cells.iter().all(Cell::is_blank))
    }
}
