//! The ingestion pipeline.
//!
//! A sheet goes through these stages in order:
//!
//! 1. [`locate_header`] finds the row holding the anchor columns.
//! 2. [`resolve_headers`] settles each column's label and section group.
//! 3. [`map_columns`] maps columns to canonical fields.
//! 4. [`locate_first_data_row`] skips repeated header lines.
//! 5. [`extract_rows`] coerces each data row into an [`ExtractedRecord`].
//! 6. [`ValidIdentifiers`] drops rows for unknown employees.
//! 7. The [`RecordSink`] stores the rest.
//!
//! [`Importer`] runs the whole sequence and returns an
//! [`ImportReport`](crate::models::ImportReport).
//!
//! [`ExtractedRecord`]: crate::models::ExtractedRecord

mod column_mapper;
mod data_row_locator;
mod header_locator;
mod header_resolver;
mod identity_gate;
mod pipeline;
mod row_extractor;
mod sink;
mod title;

pub use column_mapper::{ColumnMapping, ColumnTarget, map_columns};
pub use data_row_locator::locate_first_data_row;
pub use header_locator::locate_header;
pub use header_resolver::{ResolvedHeader, carry_group_labels, resolve_headers};
pub use identity_gate::{IdentityMatch, ValidIdentifiers};
pub use pipeline::{CommitPolicy, ImportOptions, Importer, PreparedSheet};
pub use row_extractor::{coerce, extract_row, extract_rows};
pub use sink::{MemoryBatch, MemoryStore, RecordSink, StoredRecord};
pub use title::{derive_title, parse_period, render_title};
