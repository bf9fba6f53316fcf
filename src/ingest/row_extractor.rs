//! Data row extraction and value coercion.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{CanonicalField, Cell, ExtractedRecord, FieldValue, RawGrid, ValueKind};
use crate::normalize::is_blank;

use super::column_mapper::ColumnMapping;

/// Extracts every data row from `first_data_row` to the end of the grid.
///
/// Rows whose code and name cells are both blank are skipped.
pub fn extract_rows<'a>(
    grid: &'a RawGrid,
    mapping: &'a ColumnMapping,
    first_data_row: Option<usize>,
) -> impl Iterator<Item = ExtractedRecord> + 'a {
    let start = first_data_row.unwrap_or(grid.height());
    (start..grid.height()).filter_map(move |row| extract_row(grid, row, mapping))
}

/// Converts one grid row into a record.
///
/// Returns `None` when the row has neither an employee code nor a name.
/// Cells that cannot be coerced are left out of the record; they never fail
/// the row.
pub fn extract_row(grid: &RawGrid, row: usize, mapping: &ColumnMapping) -> Option<ExtractedRecord> {
    let cells = grid.row(row)?;
    let anchor_text = |column: Option<usize>| {
        column
            .and_then(|column| cells.get(column))
            .map(Cell::text)
            .filter(|text| !is_blank(text))
    };

    let code = anchor_text(mapping.code_column());
    let name = anchor_text(mapping.name_column());
    if code.is_none() && name.is_none() {
        return None;
    }

    let mut values = BTreeMap::new();
    for target in mapping.iter() {
        let Some(cell) = cells.get(target.column) else {
            continue;
        };
        let text = match target.field {
            CanonicalField::SequenceNumber => cell.display_text(),
            _ => cell.text(),
        };
        if let Some(value) = coerce(target.field.kind(), text) {
            values.insert(target.field, value);
        }
    }

    Some(ExtractedRecord {
        row,
        employee_id: code.map(|code| code.trim().to_string()),
        values,
    })
}

/// Coerces cell text into a value of the given kind.
///
/// Numeric kinds keep only digits, `.` and `-` before parsing, so
/// `"8 giờ"` reads as 8. Money is kept exactly as shown, only trimmed.
///
/// # Examples
///
/// ```
/// use payroll_ingest::ingest::coerce;
/// use payroll_ingest::models::{FieldValue, ValueKind};
///
/// assert_eq!(coerce(ValueKind::IntegerCount, " 2 người"), Some(FieldValue::Integer(2)));
/// assert_eq!(
///     coerce(ValueKind::MoneyString, " 1.500.000 "),
///     Some(FieldValue::Money("1.500.000".to_string()))
/// );
/// assert_eq!(coerce(ValueKind::DecimalHours, "n/a"), None);
/// ```
pub fn coerce(kind: ValueKind, text: &str) -> Option<FieldValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match kind {
        ValueKind::Text => Some(FieldValue::Text(trimmed.to_string())),
        ValueKind::MoneyString => Some(FieldValue::Money(trimmed.to_string())),
        ValueKind::DecimalHours => parse_numeric(trimmed).map(FieldValue::Decimal),
        ValueKind::IntegerCount => parse_numeric(trimmed)
            .and_then(|value| value.trunc().to_i64())
            .map(FieldValue::Integer),
    }
}

fn parse_numeric(text: &str) -> Option<Decimal> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&kept).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::ingest::{map_columns, resolve_headers};

    fn mapping_for(grid: &RawGrid) -> ColumnMapping {
        let config = ConfigLoader::builtin().unwrap();
        let headers = resolve_headers(grid, 0, config.layout());
        map_columns(&headers, config.catalog(), config.layout()).unwrap()
    }

    #[test]
    fn test_coerce_text_trims_and_drops_blank() {
        assert_eq!(
            coerce(ValueKind::Text, "  Kế toán "),
            Some(FieldValue::Text("Kế toán".to_string()))
        );
        assert_eq!(coerce(ValueKind::Text, "   "), None);
    }

    #[test]
    fn test_coerce_decimal_strips_noise() {
        assert_eq!(
            coerce(ValueKind::DecimalHours, "25.5 ngày"),
            Some(FieldValue::Decimal(Decimal::new(255, 1)))
        );
        assert_eq!(
            coerce(ValueKind::DecimalHours, "-1.25"),
            Some(FieldValue::Decimal(Decimal::new(-125, 2)))
        );
        assert_eq!(coerce(ValueKind::DecimalHours, "1.2.3"), None);
        assert_eq!(coerce(ValueKind::DecimalHours, "-"), None);
    }

    #[test]
    fn test_coerce_integer_truncates_toward_zero() {
        assert_eq!(coerce(ValueKind::IntegerCount, "2.9"), Some(FieldValue::Integer(2)));
        assert_eq!(coerce(ValueKind::IntegerCount, "-2.9"), Some(FieldValue::Integer(-2)));
        assert_eq!(coerce(ValueKind::IntegerCount, "abc"), None);
    }

    #[test]
    fn test_money_text_is_kept_byte_for_byte() {
        for shown in ["1.500.000", "1,500,000.50", "(250.000)", "-", "5.000.000 đ"] {
            assert_eq!(
                coerce(ValueKind::MoneyString, shown),
                Some(FieldValue::Money(shown.to_string()))
            );
        }
    }

    #[test]
    fn test_extract_row_reads_mapped_columns() {
        let grid = RawGrid::from_text(vec![
            vec!["STT", "MSNV", "HỌ VÀ TÊN", "NGÀY CÔNG", "THỰC LÃNH", "GHI CHÚ"],
            vec!["1", " E001 ", "Nguyễn Văn A", "26", "7.250.000", ""],
        ]);
        let mapping = mapping_for(&grid);
        let record = extract_row(&grid, 1, &mapping).unwrap();

        assert_eq!(record.row, 1);
        assert_eq!(record.employee_id.as_deref(), Some("E001"));
        assert_eq!(record.integer(CanonicalField::SequenceNumber), Some(1));
        assert_eq!(record.employee_name(), Some("Nguyễn Văn A"));
        assert_eq!(
            record.decimal(CanonicalField::WorkingDays),
            Some(Decimal::new(26, 0))
        );
        assert_eq!(record.money(CanonicalField::NetPay), Some("7.250.000"));
        assert_eq!(record.get(CanonicalField::Note), None);
    }

    #[test]
    fn test_display_text_wins_over_value() {
        let grid = RawGrid::new(vec![
            vec![Cell::new("MSNV"), Cell::new("HỌ VÀ TÊN"), Cell::new("THỰC LÃNH")],
            vec![
                Cell::new("E001"),
                Cell::new("An"),
                Cell::with_display("7250000", "7.250.000"),
            ],
        ]);
        let mapping = mapping_for(&grid);
        let record = extract_row(&grid, 1, &mapping).unwrap();
        assert_eq!(record.money(CanonicalField::NetPay), Some("7.250.000"));
    }

    #[test]
    fn test_sequence_number_uses_display_only() {
        let grid = RawGrid::new(vec![
            vec![Cell::new("STT"), Cell::new("MSNV"), Cell::new("HỌ VÀ TÊN")],
            vec![Cell::with_display("1", ""), Cell::new("E001"), Cell::new("An")],
            vec![Cell::with_display("2", "2"), Cell::new("E002"), Cell::new("Bình")],
        ]);
        let mapping = mapping_for(&grid);

        let hidden = extract_row(&grid, 1, &mapping).unwrap();
        assert_eq!(hidden.get(CanonicalField::SequenceNumber), None);

        let shown = extract_row(&grid, 2, &mapping).unwrap();
        assert_eq!(shown.integer(CanonicalField::SequenceNumber), Some(2));
    }

    #[test]
    fn test_row_without_identity_is_skipped() {
        let grid = RawGrid::from_text(vec![
            vec!["MSNV", "HỌ VÀ TÊN", "THỰC LÃNH"],
            vec!["", " ", "100.000.000"],
        ]);
        let mapping = mapping_for(&grid);
        assert!(extract_row(&grid, 1, &mapping).is_none());
    }

    #[test]
    fn test_row_with_name_only_has_no_identifier() {
        let grid = RawGrid::from_text(vec![vec!["MSNV", "HỌ VÀ TÊN"], vec!["", "Chị Hoa"]]);
        let mapping = mapping_for(&grid);
        let record = extract_row(&grid, 1, &mapping).unwrap();
        assert_eq!(record.employee_id, None);
        assert_eq!(record.employee_name(), Some("Chị Hoa"));
    }

    #[test]
    fn test_extract_rows_skips_blank_lines() {
        let grid = RawGrid::from_text(vec![
            vec!["MSNV", "HỌ VÀ TÊN"],
            vec!["E001", "An"],
            vec!["", ""],
            vec!["E002", "Bình"],
        ]);
        let mapping = mapping_for(&grid);
        let rows: Vec<usize> = extract_rows(&grid, &mapping, Some(1))
            .map(|record| record.row)
            .collect();
        assert_eq!(rows, vec![1, 3]);
        assert_eq!(extract_rows(&grid, &mapping, None).count(), 0);
    }
}
