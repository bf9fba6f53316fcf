//! Import orchestration.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{ImportReport, RawGrid, ReportPeriod, RowFailure};

use super::column_mapper::{ColumnMapping, map_columns};
use super::data_row_locator::locate_first_data_row;
use super::header_locator::locate_header;
use super::header_resolver::resolve_headers;
use super::identity_gate::ValidIdentifiers;
use super::row_extractor::extract_rows;
use super::sink::RecordSink;
use super::title::derive_title;

/// What an import does when the sink refuses a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Count the failure and keep going; stored rows stay stored.
    #[default]
    PartialCommit,
    /// Stop at the first failure and roll the whole batch back.
    AllOrNothing,
}

/// Per-import settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// How persistence failures are handled.
    #[serde(default)]
    pub commit_policy: CommitPolicy,
}

/// A sheet whose structure has been resolved, ready for row extraction.
#[derive(Debug, Clone)]
pub struct PreparedSheet {
    /// Zero-based header row.
    pub header_row: usize,
    /// Column to field mapping.
    pub mapping: ColumnMapping,
    /// Zero-based first data row, if any.
    pub first_data_row: Option<usize>,
    /// Report title.
    pub title: String,
    /// Reporting period named by the title.
    pub period: Option<ReportPeriod>,
}

/// Runs payroll sheet imports against a shared configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use payroll_ingest::config::ConfigLoader;
/// use payroll_ingest::ingest::{Importer, MemoryStore, ValidIdentifiers};
/// use payroll_ingest::models::RawGrid;
///
/// # #[tokio::main]
/// # async fn main() {
/// let importer = Importer::new(Arc::new(ConfigLoader::builtin().unwrap()));
/// let grid = RawGrid::from_text(vec![
///     vec!["BẢNG LƯƠNG THÁNG 10/2024", "", ""],
///     vec!["MSNV", "HỌ VÀ TÊN", "THỰC LÃNH"],
///     vec!["E001", "Nguyễn Văn A", "7.250.000"],
///     vec!["E999", "Người Lạ", "1.000.000"],
/// ]);
/// let identifiers = ValidIdentifiers::new(["E001"], Vec::<String>::new());
/// let store = Arc::new(MemoryStore::new());
///
/// let report = importer.run(&grid, &identifiers, &store.batch()).await.unwrap();
/// assert_eq!(report.inserted, 1);
/// assert_eq!(report.skipped_unknown_identity, 1);
/// assert_eq!(report.title, "Bảng lương tháng 10/2024");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Importer {
    config: Arc<ConfigLoader>,
    options: ImportOptions,
}

impl Importer {
    /// Creates an importer with default options.
    pub fn new(config: Arc<ConfigLoader>) -> Self {
        Self {
            config,
            options: ImportOptions::default(),
        }
    }

    /// Replaces the import options.
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the import options.
    pub fn options(&self) -> ImportOptions {
        self.options
    }

    /// Resolves the sheet structure without touching any row.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HeaderNotFound`] or
    /// [`EngineError::MissingMandatoryColumn`] when the sheet cannot be
    /// imported at all.
    pub fn prepare(&self, grid: &RawGrid) -> EngineResult<PreparedSheet> {
        let catalog = self.config.catalog();
        let layout = self.config.layout();

        let header_row = locate_header(grid, catalog, layout.header_scan_limit())?;
        let headers = resolve_headers(grid, header_row, layout);
        let mapping = map_columns(&headers, catalog, layout)?;
        let first_data_row = locate_first_data_row(grid, header_row, &mapping, catalog);
        let (title, period) = derive_title(grid, header_row, layout);

        debug!(
            header_row,
            first_data_row = ?first_data_row,
            mapped_columns = mapping.len(),
            title = %title,
            "Prepared sheet"
        );

        Ok(PreparedSheet {
            header_row,
            mapping,
            first_data_row,
            title,
            period,
        })
    }

    /// Imports every data row of `grid` into `sink`.
    ///
    /// Rows are checked against `identifiers` and persisted one at a time in
    /// sheet order. Unknown employees are counted and dropped.
    ///
    /// # Errors
    ///
    /// Structural errors from [`Importer::prepare`] are returned before any
    /// row is persisted. Under [`CommitPolicy::AllOrNothing`] a refused
    /// record rolls the sink back and returns
    /// [`EngineError::BatchRolledBack`], and a failed commit returns
    /// [`EngineError::CommitFailed`].
    pub async fn run<S: RecordSink>(
        &self,
        grid: &RawGrid,
        identifiers: &ValidIdentifiers,
        sink: &S,
    ) -> EngineResult<ImportReport> {
        let start_time = Instant::now();
        let sheet = self.prepare(grid)?;
        let policy = self.options.commit_policy;

        info!(
            header_row = sheet.header_row,
            columns = sheet.mapping.len(),
            policy = ?policy,
            "Starting payroll import"
        );

        let mut report = ImportReport {
            inserted: 0,
            skipped_unknown_identity: 0,
            failed: 0,
            title: sheet.title,
            period: sheet.period,
            header_row: sheet.header_row,
            first_data_row: sheet.first_data_row,
            failures: Vec::new(),
        };

        for record in extract_rows(grid, &sheet.mapping, sheet.first_data_row) {
            let Some(matched) = identifiers.check(record.employee_id.as_deref()) else {
                debug!(
                    row = record.row,
                    employee_id = ?record.employee_id,
                    "Skipping row with unknown employee"
                );
                report.skipped_unknown_identity += 1;
                continue;
            };

            match sink.persist(&record).await {
                Ok(()) => {
                    debug!(row = record.row, matched = ?matched, "Stored record");
                    report.inserted += 1;
                }
                Err(error) => {
                    warn!(row = record.row, error = %error, "Failed to store record");
                    if policy == CommitPolicy::AllOrNothing {
                        sink.rollback().await;
                        return Err(EngineError::BatchRolledBack {
                            row: record.row,
                            message: error.message,
                        });
                    }
                    report.failed += 1;
                    report.failures.push(RowFailure {
                        row: record.row,
                        employee_id: record.employee_id.clone().unwrap_or_default(),
                        message: error.message,
                    });
                }
            }
        }

        if policy == CommitPolicy::AllOrNothing {
            if let Err(error) = sink.commit().await {
                warn!(error = %error, "Commit failed, rolling back");
                sink.rollback().await;
                return Err(EngineError::CommitFailed {
                    message: error.message,
                });
            }
        }

        info!(
            inserted = report.inserted,
            skipped_unknown_identity = report.skipped_unknown_identity,
            failed = report.failed,
            duration_us = start_time.elapsed().as_micros(),
            "Payroll import completed"
        );
        Ok(report)
    }
}
