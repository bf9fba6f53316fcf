//! Configuration loading and management for the ingestion engine.
//!
//! This module loads the alias table that maps header wording to canonical
//! fields, and the layout conventions (section markers, header search depth,
//! title template) from YAML files.
//!
//! # Example
//!
//! ```
//! use payroll_ingest::config::ConfigLoader;
//!
//! let config = ConfigLoader::builtin().unwrap();
//! assert!(config.layout().header_scan_limit() > 0);
//! ```

mod catalog;
mod loader;
mod types;

pub use catalog::{AliasCatalog, AliasMatch, SheetLayout};
pub use loader::ConfigLoader;
pub use types::{AliasEntry, FieldsConfig, GroupMarkers, LayoutConfig, TitleConfig};
