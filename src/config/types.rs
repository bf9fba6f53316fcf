//! Configuration types for report ingestion.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::{CanonicalField, Section};

/// One row of the alias table.
///
/// Entries tagged with `requires_group` are collision-prone: their aliases
/// are shared with an entry tagged for the other section.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasEntry {
    /// The field these labels resolve to.
    pub field: CanonicalField,
    /// Accepted header labels, in any accent or case.
    pub aliases: Vec<String>,
    /// The section a column must sit under to resolve to this field.
    #[serde(default)]
    pub requires_group: Option<Section>,
}

/// Structure of `fields.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsConfig {
    /// The alias table.
    pub fields: Vec<AliasEntry>,
}

/// Section marker labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupMarkers {
    /// Labels that open an income section.
    #[serde(default)]
    pub income: Vec<String>,
    /// Labels that open a deduction section.
    #[serde(default)]
    pub deduction: Vec<String>,
}

/// How the report title is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleConfig {
    /// Template with `{month}` and `{year}` placeholders.
    pub template: String,
    /// Title used when the sheet has no title cell.
    pub fallback: String,
}

/// Structure of `layout.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Section markers found above the header row.
    pub group_markers: GroupMarkers,
    /// Section assumed for shared labels under no marker.
    #[serde(default = "default_unlabeled_group")]
    pub unlabeled_group: Section,
    /// How many rows are searched for the header.
    #[serde(default = "default_header_scan_limit")]
    pub header_scan_limit: usize,
    /// Title rendering.
    pub title: TitleConfig,
}

fn default_unlabeled_group() -> Section {
    Section::Income
}

fn default_header_scan_limit() -> usize {
    50
}
