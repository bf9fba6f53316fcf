//! Response types for the payroll import API.
//!
//! This module defines the success body, the error response structures and
//! the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::ImportReport;

/// Response body for a completed import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// The batch the records were stored under.
    pub batch_id: Uuid,
    /// The import outcome.
    #[serde(flatten)]
    pub report: ImportReport,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::AliasConflict { .. }
            | EngineError::InvalidAlias { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::HeaderNotFound { scanned_rows } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "HEADER_NOT_FOUND",
                    message,
                    format!(
                        "No row among the first {} holds both the employee code and the employee name columns",
                        scanned_rows
                    ),
                ),
            ),
            EngineError::MissingMandatoryColumn { field } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MISSING_MANDATORY_COLUMN",
                    message,
                    format!("The sheet has no column recognized as '{}'", field),
                ),
            ),
            EngineError::Workbook { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_WORKBOOK", message),
            ),
            EngineError::BatchRolledBack { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "BATCH_ROLLED_BACK",
                    message,
                    "No record of this import was kept",
                ),
            ),
            EngineError::CommitFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("COMMIT_FAILED", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
