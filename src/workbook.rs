//! Spreadsheet decoding.
//!
//! Reads the first worksheet of an `.xlsx`, `.xls`, `.xlsb` or `.ods` file
//! into a [`RawGrid`]. Only cell values are available through this path;
//! display formatting is not reproduced.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Cell, RawGrid};

/// Decodes the first worksheet of the workbook at `path`.
///
/// # Errors
///
/// Returns [`EngineError::Workbook`] when the file cannot be opened, is not
/// a supported spreadsheet, or has no worksheet.
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> EngineResult<RawGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| EngineError::Workbook {
        message: format!("failed to open {}: {}", path.display(), e),
    })?;
    let range = first_range(&mut workbook)?;
    debug!(path = %path.display(), "Decoded workbook");
    Ok(grid_from_range(&range))
}

/// Decodes the first worksheet of an in-memory workbook.
///
/// # Errors
///
/// Returns [`EngineError::Workbook`] when the bytes are not a supported
/// spreadsheet or hold no worksheet.
pub fn read_first_sheet_from_bytes(bytes: &[u8]) -> EngineResult<RawGrid> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| EngineError::Workbook {
            message: e.to_string(),
        })?;
    let range = first_range(&mut workbook)?;
    Ok(grid_from_range(&range))
}

fn first_range<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> EngineResult<Range<Data>> {
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(EngineError::Workbook {
            message: e.to_string(),
        }),
        None => Err(EngineError::Workbook {
            message: "workbook has no worksheet".to_string(),
        }),
    }
}

/// Converts a decoded worksheet range into a grid.
///
/// The range's offset from `A1` is kept as leading blank rows and columns,
/// so grid indices match sheet positions.
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let leading = (0..row_offset).map(|_| Vec::<Cell>::new());
    let rows = range.rows().map(|row| {
        std::iter::repeat_with(Cell::default)
            .take(col_offset)
            .chain(row.iter().map(|data| Cell::new(cell_to_string(data))))
            .collect::<Vec<Cell>>()
    });

    RawGrid::new(leading.chain(rows).collect())
}

/// Renders a decoded cell as text.
///
/// Whole floats are written without a fractional part, as spreadsheets
/// store every number as a float.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", *v as i64)
            } else {
                v.to_string()
            }
        }
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
