//! Payroll Report Ingestion Engine
//!
//! This crate reads human-authored payroll spreadsheets, whose header
//! wording, column order and section layout vary from report to report, and
//! resolves them into canonical, typed records ready for persistence.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod workbook;
