//! Typed records extracted from data rows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// A coerced cell value.
///
/// # Example
///
/// ```
/// use payroll_ingest::models::FieldValue;
///
/// let value = FieldValue::Money("1.500.000".to_string());
/// assert_eq!(value.as_text(), Some("1.500.000"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Trimmed text.
    Text(String),
    /// A whole number.
    Integer(i64),
    /// A fractional number.
    Decimal(Decimal),
    /// A money amount exactly as displayed.
    Money(String),
}

impl FieldValue {
    /// Returns the text of a `Text` or `Money` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Money(text) => Some(text),
            Self::Integer(_) | Self::Decimal(_) => None,
        }
    }
}

/// One data row resolved into canonical fields.
///
/// Fields missing from the sheet, or whose cell could not be coerced, are
/// simply absent from `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Zero-based grid row the record came from.
    pub row: usize,
    /// The identifier checked against the directory (the employee code).
    pub employee_id: Option<String>,
    /// Coerced values by field.
    pub values: BTreeMap<CanonicalField, FieldValue>,
}

impl ExtractedRecord {
    /// Returns the value of a field, if present.
    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns the text of a `Text` or `Money` field.
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Returns the displayed text of a money field.
    pub fn money(&self, field: CanonicalField) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Money(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns a decimal field.
    pub fn decimal(&self, field: CanonicalField) -> Option<Decimal> {
        match self.get(field) {
            Some(FieldValue::Decimal(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns an integer field.
    pub fn integer(&self, field: CanonicalField) -> Option<i64> {
        match self.get(field) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// The employee's name, if the row had one.
    pub fn employee_name(&self) -> Option<&str> {
        self.text(CanonicalField::EmployeeName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ExtractedRecord {
        let mut values = BTreeMap::new();
        values.insert(
            CanonicalField::EmployeeCode,
            FieldValue::Text("E001".to_string()),
        );
        values.insert(
            CanonicalField::EmployeeName,
            FieldValue::Text("Nguyễn Văn A".to_string()),
        );
        values.insert(
            CanonicalField::NetPay,
            FieldValue::Money("7.250.000".to_string()),
        );
        values.insert(
            CanonicalField::WorkingDays,
            FieldValue::Decimal(Decimal::new(255, 1)),
        );
        values.insert(CanonicalField::SequenceNumber, FieldValue::Integer(1));
        ExtractedRecord {
            row: 4,
            employee_id: Some("E001".to_string()),
            values,
        }
    }

    #[test]
    fn test_typed_accessors() {
        let record = sample_record();
        assert_eq!(record.money(CanonicalField::NetPay), Some("7.250.000"));
        assert_eq!(
            record.decimal(CanonicalField::WorkingDays),
            Some(Decimal::new(255, 1))
        );
        assert_eq!(record.integer(CanonicalField::SequenceNumber), Some(1));
        assert_eq!(record.employee_name(), Some("Nguyễn Văn A"));
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let record = sample_record();
        assert_eq!(record.money(CanonicalField::EmployeeCode), None);
        assert_eq!(record.decimal(CanonicalField::NetPay), None);
        assert_eq!(record.text(CanonicalField::SequenceNumber), None);
        assert_eq!(record.text(CanonicalField::BasicSalary), None);
    }

    #[test]
    fn test_serializes_with_field_keys() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["values"]["net_pay"]["kind"], "money");
        assert_eq!(json["values"]["net_pay"]["value"], "7.250.000");
        assert_eq!(json["values"]["working_days"]["value"], "25.5");
        assert_eq!(json["employee_id"], "E001");
    }
}
