//! HTTP API module for the payroll ingestion engine.
//!
//! This module exposes `POST /imports`, which runs one import over a sheet
//! sent as JSON and stores the accepted records in the shared store.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CellRequest, IdentifiersRequest, ImportRequest};
pub use response::{ApiError, ApiErrorResponse, ImportResponse};
pub use state::AppState;
