//! Import outcome models.
//!
//! An [`ImportReport`] is the complete result of one import: how many rows
//! were stored, skipped or failed, and the reporting period read from the
//! sheet title.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The month a payroll report covers.
///
/// # Example
///
/// ```
/// use payroll_ingest::models::ReportPeriod;
/// use chrono::NaiveDate;
///
/// let period = ReportPeriod { month: 2, year: 2024 };
/// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
/// assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl ReportPeriod {
    /// First day of the period.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last day of the period.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).and_then(|next| next.pred_opt())
    }
}

/// A record that could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Zero-based grid row.
    pub row: usize,
    /// The employee identifier of the record.
    pub employee_id: String,
    /// Why persistence failed.
    pub message: String,
}

/// The terminal output of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Records handed to the sink and stored.
    pub inserted: u32,
    /// Records dropped because their identifier is unknown.
    pub skipped_unknown_identity: u32,
    /// Records the sink refused.
    pub failed: u32,
    /// Human-readable title describing the reporting period.
    pub title: String,
    /// The reporting period, when the title names one.
    pub period: Option<ReportPeriod>,
    /// Zero-based index of the header row.
    pub header_row: usize,
    /// Zero-based index of the first data row, if the sheet has any.
    pub first_data_row: Option<usize>,
    /// Details of every persistence failure, in row order.
    #[serde(default)]
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    /// Total number of records that reached the identity check.
    pub fn processed(&self) -> u32 {
        self.inserted + self.skipped_unknown_identity + self.failed
    }
}
