//! HTTP request handlers for the payroll import API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ingest::ValidIdentifiers;
use crate::models::RawGrid;

use super::request::ImportRequest;
use super::response::{ApiError, ApiErrorResponse, ImportResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/imports", post(import_handler))
        .with_state(state)
}

/// Handler for POST /imports endpoint.
///
/// Accepts a decoded sheet and returns the import report.
async fn import_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing import request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let options = request.options();
    let identifiers: ValidIdentifiers = request.valid_identifiers.into();
    let grid: RawGrid = request.grid.into();
    let importer = state.importer().with_options(options);
    let batch = state.store().batch();

    let start_time = Instant::now();
    match importer.run(&grid, &identifiers, &batch).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                batch_id = %batch.id(),
                rows = grid.height(),
                inserted = report.inserted,
                skipped_unknown_identity = report.skipped_unknown_identity,
                failed = report.failed,
                duration_us = start_time.elapsed().as_micros(),
                "Import completed successfully"
            );
            let body = ImportResponse {
                batch_id: batch.id(),
                report,
            };
            json_response(StatusCode::OK, body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Import failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
