//! Request types for the payroll import API.
//!
//! This module defines the JSON request structures for the `/imports` endpoint.

use serde::{Deserialize, Serialize};

use crate::ingest::{CommitPolicy, ImportOptions, ValidIdentifiers};
use crate::models::{Cell, RawGrid};

/// Request body for the `/imports` endpoint.
///
/// Contains the decoded sheet and the identifiers the import accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// The sheet, row by row.
    pub grid: Vec<Vec<CellRequest>>,
    /// Employee codes and login names known to the directory.
    #[serde(default)]
    pub valid_identifiers: IdentifiersRequest,
    /// How persistence failures are handled.
    #[serde(default)]
    pub commit_policy: CommitPolicy,
}

/// One cell in an import request.
///
/// Cells may be sent as plain text, as a number, as `null`, or as an object
/// carrying both the underlying value and the displayed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellRequest {
    /// A cell given as plain text.
    Text(String),
    /// A cell given as a JSON number.
    Number(serde_json::Number),
    /// A cell with an explicit display form.
    Detailed {
        /// The underlying value as text.
        #[serde(default)]
        value: String,
        /// The text the spreadsheet shows.
        #[serde(default)]
        display: Option<String>,
    },
    /// An empty cell.
    Empty,
}

/// Identifier lists in an import request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifiersRequest {
    /// Known employee codes.
    #[serde(default)]
    pub employee_codes: Vec<String>,
    /// Known login names.
    #[serde(default)]
    pub login_names: Vec<String>,
}

impl ImportRequest {
    /// Import options carried by the request.
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            commit_policy: self.commit_policy,
        }
    }
}

impl From<CellRequest> for Cell {
    fn from(req: CellRequest) -> Self {
        match req {
            CellRequest::Text(text) => Cell::new(text),
            CellRequest::Number(number) => Cell::new(number.to_string()),
            CellRequest::Detailed { value, display } => Cell { value, display },
            CellRequest::Empty => Cell::default(),
        }
    }
}

impl From<Vec<Vec<CellRequest>>> for RawGrid {
    fn from(rows: Vec<Vec<CellRequest>>) -> Self {
        RawGrid::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

impl From<IdentifiersRequest> for ValidIdentifiers {
    fn from(req: IdentifiersRequest) -> Self {
        ValidIdentifiers::new(req.employee_codes, req.login_names)
    }
}
