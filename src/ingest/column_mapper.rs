//! Column index to canonical field mapping.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{AliasCatalog, SheetLayout};
use crate::error::{EngineError, EngineResult};
use crate::models::{CanonicalField, GroupLabel};
use crate::normalize::normalize_text;

use super::header_resolver::ResolvedHeader;

/// Where one column's values go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnTarget {
    /// Zero-based column index.
    pub column: usize,
    /// The canonical field the column feeds.
    pub field: CanonicalField,
    /// The group label the column was found under.
    pub group: GroupLabel,
}

/// The resolved columns of one sheet.
///
/// Each canonical field is fed by at most one column. The mapping is built
/// once per import and never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    targets: Vec<ColumnTarget>,
    by_field: HashMap<CanonicalField, usize>,
}

impl ColumnMapping {
    fn insert(&mut self, target: ColumnTarget) {
        self.by_field.insert(target.field, target.column);
        let position = self
            .targets
            .partition_point(|mapped| mapped.column < target.column);
        self.targets.insert(position, target);
    }

    /// Replaces the column feeding `target.field`, returning the displaced one.
    fn replace(&mut self, target: ColumnTarget) -> Option<ColumnTarget> {
        let column = self.by_field.remove(&target.field)?;
        let position = self.targets.iter().position(|mapped| mapped.column == column)?;
        let displaced = self.targets.remove(position);
        self.insert(target);
        Some(displaced)
    }

    /// Returns the column feeding `field`.
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.by_field.get(&field).copied()
    }

    /// Returns the target of a column, if the column is mapped.
    pub fn target(&self, column: usize) -> Option<&ColumnTarget> {
        self.targets.iter().find(|target| target.column == column)
    }

    /// Column of the employee code.
    ///
    /// Always present on a mapping returned by [`map_columns`].
    pub fn code_column(&self) -> Option<usize> {
        self.column(CanonicalField::EmployeeCode)
    }

    /// Column of the employee name.
    pub fn name_column(&self) -> Option<usize> {
        self.column(CanonicalField::EmployeeName)
    }

    /// Iterates over mapped columns in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnTarget> {
        self.targets.iter()
    }

    /// Number of mapped columns.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if no column is mapped.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Maps resolved header columns to canonical fields.
///
/// The first column resolving to a field wins. A shared income/deduction
/// label picks its target by the column's group label; unlabeled columns use
/// the layout's default section. A shared label under an explicit group
/// takes its target over from an earlier unlabeled column.
///
/// # Errors
///
/// Returns [`EngineError::MissingMandatoryColumn`] when the employee code or
/// the employee name cannot be resolved.
pub fn map_columns(
    headers: &[ResolvedHeader],
    catalog: &AliasCatalog,
    layout: &SheetLayout,
) -> EngineResult<ColumnMapping> {
    let mut mapping = ColumnMapping::default();

    for (column, header) in headers.iter().enumerate() {
        let normalized = normalize_text(&header.label);
        let Some(hit) = catalog.resolve(&normalized) else {
            continue;
        };

        let field = hit.for_group(header.group, layout.unlabeled_group());
        let target = ColumnTarget {
            column,
            field,
            group: header.group,
        };
        let Some(existing) = mapping.column(field).and_then(|col| mapping.target(col).copied())
        else {
            mapping.insert(target);
            debug!(column, %field, group = ?header.group, "Mapped column");
            continue;
        };

        let takes_over = hit.is_collision_prone()
            && existing.group.section().is_none()
            && header.group.section().is_some();
        if takes_over && mapping.replace(target).is_some() {
            warn!(
                column,
                displaced_column = existing.column,
                %field,
                group = ?header.group,
                "Grouped column replaces unlabeled column"
            );
        } else {
            warn!(column, %field, label = %header.label, "Ignoring duplicate column");
        }
    }

    let mandatory = CanonicalField::ALL.into_iter().filter(|field| field.is_mandatory());
    for field in mandatory {
        if mapping.column(field).is_none() {
            return Err(EngineError::MissingMandatoryColumn { field });
        }
    }

    Ok(mapping)
}
