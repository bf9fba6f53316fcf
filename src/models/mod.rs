//! Core data models for the ingestion engine.
//!
//! This module contains the grid the engine reads, the canonical field
//! vocabulary, the records it produces and the report it returns.

mod field;
mod grid;
mod record;
mod report;

pub use field::{CanonicalField, GroupLabel, Section, ValueKind};
pub use grid::{Cell, RawGrid};
pub use record::{ExtractedRecord, FieldValue};
pub use report::{ImportReport, ReportPeriod, RowFailure};
