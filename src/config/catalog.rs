//! Compiled alias catalog and sheet layout.
//!
//! The catalog is built once from the alias table and is read-only
//! afterwards, so it can be shared across concurrent imports.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{CanonicalField, GroupLabel, Section};
use crate::normalize::{compact_key, normalize_text};

use super::types::{AliasEntry, LayoutConfig, TitleConfig};

/// The outcome of matching a normalized label against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasMatch {
    /// The label belongs to exactly one field.
    Field(CanonicalField),
    /// The label is shared by an income field and a deduction field.
    Grouped {
        /// Target when the column sits in the income section.
        income: CanonicalField,
        /// Target when the column sits in the deduction section.
        deduction: CanonicalField,
    },
}

impl AliasMatch {
    /// Picks the target field for a column with the given group label.
    ///
    /// `unlabeled` is the section assumed for columns under no marker.
    pub fn for_group(self, group: GroupLabel, unlabeled: Section) -> CanonicalField {
        match self {
            Self::Field(field) => field,
            Self::Grouped { income, deduction } => {
                match group.section().unwrap_or(unlabeled) {
                    Section::Income => income,
                    Section::Deduction => deduction,
                }
            }
        }
    }

    /// Returns true if the label needed a group label to resolve.
    pub fn is_collision_prone(self) -> bool {
        matches!(self, Self::Grouped { .. })
    }
}

#[derive(Debug, Clone)]
struct CompiledEntry {
    field: CanonicalField,
    requires_group: Option<Section>,
    matcher: Regex,
}

/// Maps normalized header labels to canonical fields.
///
/// # Example
///
/// ```
/// use payroll_ingest::config::{AliasCatalog, AliasMatch};
/// use payroll_ingest::models::CanonicalField;
/// use payroll_ingest::normalize::normalize_text;
///
/// let catalog = AliasCatalog::builtin().unwrap();
/// assert_eq!(
///     catalog.resolve(&normalize_text("Lương  CB")),
///     Some(AliasMatch::Field(CanonicalField::BasicSalary))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AliasCatalog {
    entries: Vec<CompiledEntry>,
}

impl AliasCatalog {
    /// Compiles and validates an alias table.
    ///
    /// Fails when a field is declared twice, when an entry has no usable
    /// alias, or when two entries claim the same label without forming an
    /// income/deduction pair.
    pub fn compile(table: &[AliasEntry]) -> EngineResult<Self> {
        let mut declared = HashSet::new();
        let mut claims: HashMap<String, Vec<(CanonicalField, Option<Section>, String)>> =
            HashMap::new();
        let mut entries = Vec::with_capacity(table.len());

        for entry in table {
            if !declared.insert(entry.field) {
                return Err(EngineError::InvalidAlias {
                    field: entry.field,
                    message: "field is declared more than once".to_string(),
                });
            }
            if entry.aliases.is_empty() {
                return Err(EngineError::InvalidAlias {
                    field: entry.field,
                    message: "no aliases given".to_string(),
                });
            }

            let mut alternatives = Vec::with_capacity(entry.aliases.len());
            for alias in &entry.aliases {
                let normalized = normalize_text(alias);
                if normalized.is_empty() {
                    return Err(EngineError::InvalidAlias {
                        field: entry.field,
                        message: format!("alias '{}' is blank after normalization", alias),
                    });
                }
                let claimants = claims.entry(compact_key(&normalized)).or_default();
                if !claimants.iter().any(|(field, _, _)| *field == entry.field) {
                    claimants.push((entry.field, entry.requires_group, normalized.clone()));
                }
                alternatives.push(flexible_pattern(&normalized));
            }

            let pattern = format!("^(?:{})$", alternatives.join("|"));
            let matcher = Regex::new(&pattern).map_err(|e| EngineError::InvalidAlias {
                field: entry.field,
                message: e.to_string(),
            })?;

            entries.push(CompiledEntry {
                field: entry.field,
                requires_group: entry.requires_group,
                matcher,
            });
        }

        for claimants in claims.values() {
            check_claimants(claimants)?;
        }

        debug!(fields = entries.len(), "Compiled alias catalog");
        Ok(Self { entries })
    }

    /// Resolves a normalized label.
    pub fn resolve(&self, normalized: &str) -> Option<AliasMatch> {
        if normalized.is_empty() {
            return None;
        }

        let mut income = None;
        let mut deduction = None;
        for entry in &self.entries {
            if !entry.matcher.is_match(normalized) {
                continue;
            }
            match entry.requires_group {
                None => return Some(AliasMatch::Field(entry.field)),
                Some(Section::Income) => income = Some(entry.field),
                Some(Section::Deduction) => deduction = Some(entry.field),
            }
        }

        match (income, deduction) {
            (Some(income), Some(deduction)) => Some(AliasMatch::Grouped { income, deduction }),
            _ => None,
        }
    }

    /// Returns true if the normalized label is an alias of `field`.
    pub fn matches(&self, field: CanonicalField, normalized: &str) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .is_some_and(|entry| entry.matcher.is_match(normalized))
    }

    /// Returns true if the catalog has an entry for `field`.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.entries.iter().any(|entry| entry.field == field)
    }
}

/// Builds a pattern for a normalized alias where word separators are optional.
fn flexible_pattern(normalized: &str) -> String {
    normalized
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*")
}

/// A label may be claimed by one field, or by exactly one income field and
/// one deduction field.
fn check_claimants(claimants: &[(CanonicalField, Option<Section>, String)]) -> EngineResult<()> {
    match claimants {
        [(field, Some(_), alias)] => Err(EngineError::InvalidAlias {
            field: *field,
            message: format!(
                "collision-prone alias '{}' has no counterpart in the other section",
                alias
            ),
        }),
        [] | [_] => Ok(()),
        [(_, Some(a), _), (_, Some(b), _)] if a != b => Ok(()),
        [(first, _, alias), (second, _, _), ..] => Err(EngineError::AliasConflict {
            alias: alias.clone(),
            first: *first,
            second: *second,
        }),
    }
}

/// Sheet layout conventions: section markers, header search depth and title
/// rendering.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    markers: HashMap<String, Section>,
    unlabeled_group: Section,
    header_scan_limit: usize,
    title: TitleConfig,
}

impl SheetLayout {
    /// Builds the layout from its configuration.
    pub fn compile(config: &LayoutConfig) -> EngineResult<Self> {
        let mut markers = HashMap::new();
        let labelled = config
            .group_markers
            .income
            .iter()
            .map(|label| (label, Section::Income))
            .chain(
                config
                    .group_markers
                    .deduction
                    .iter()
                    .map(|label| (label, Section::Deduction)),
            );

        for (label, section) in labelled {
            let key = normalize_text(label);
            if key.is_empty() {
                return Err(EngineError::ConfigParseError {
                    path: "layout.yaml".to_string(),
                    message: format!("group marker '{}' is blank after normalization", label),
                });
            }
            if let Some(existing) = markers.insert(key, section) {
                if existing != section {
                    return Err(EngineError::ConfigParseError {
                        path: "layout.yaml".to_string(),
                        message: format!(
                            "group marker '{}' is listed for both income and deduction",
                            label
                        ),
                    });
                }
            }
        }

        Ok(Self {
            markers,
            unlabeled_group: config.unlabeled_group,
            header_scan_limit: config.header_scan_limit,
            title: config.title.clone(),
        })
    }

    /// Returns the section opened by a normalized marker label.
    pub fn marker(&self, normalized: &str) -> Option<Section> {
        self.markers.get(normalized).copied()
    }

    /// Section assumed for shared labels under no marker.
    pub fn unlabeled_group(&self) -> Section {
        self.unlabeled_group
    }

    /// How many rows are searched for the header.
    pub fn header_scan_limit(&self) -> usize {
        self.header_scan_limit
    }

    /// Title rendering settings.
    pub fn title(&self) -> &TitleConfig {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::GroupMarkers;

    fn entry(field: CanonicalField, aliases: &[&str], group: Option<Section>) -> AliasEntry {
        AliasEntry {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            requires_group: group,
        }
    }

    fn meal_pair() -> Vec<AliasEntry> {
        vec![
            entry(
                CanonicalField::MealFeeIncome,
                &["TIỀN ĂN"],
                Some(Section::Income),
            ),
            entry(
                CanonicalField::MealFeeDeduction,
                &["TIỀN ĂN"],
                Some(Section::Deduction),
            ),
        ]
    }

    #[test]
    fn test_resolve_is_whitespace_tolerant() {
        let catalog =
            AliasCatalog::compile(&[entry(CanonicalField::BasicSalary, &["Lương CB"], None)])
                .unwrap();
        for label in ["LƯƠNG CB", "LUONG  CB", "luongcb", "Lương-CB"] {
            assert_eq!(
                catalog.resolve(&normalize_text(label)),
                Some(AliasMatch::Field(CanonicalField::BasicSalary)),
                "label {label:?} should resolve"
            );
        }
        assert_eq!(catalog.resolve(&normalize_text("LƯƠNG CB MỚI")), None);
    }

    #[test]
    fn test_resolve_grouped_pair() {
        let catalog = AliasCatalog::compile(&meal_pair()).unwrap();
        assert_eq!(
            catalog.resolve("TIEN AN"),
            Some(AliasMatch::Grouped {
                income: CanonicalField::MealFeeIncome,
                deduction: CanonicalField::MealFeeDeduction,
            })
        );
    }

    #[test]
    fn test_grouped_match_picks_by_group() {
        let hit = AliasMatch::Grouped {
            income: CanonicalField::MealFeeIncome,
            deduction: CanonicalField::MealFeeDeduction,
        };
        assert!(hit.is_collision_prone());
        assert_eq!(
            hit.for_group(GroupLabel::Deduction, Section::Income),
            CanonicalField::MealFeeDeduction
        );
        assert_eq!(
            hit.for_group(GroupLabel::Unlabeled, Section::Income),
            CanonicalField::MealFeeIncome
        );
        assert_eq!(
            hit.for_group(GroupLabel::Unlabeled, Section::Deduction),
            CanonicalField::MealFeeDeduction
        );
    }

    #[test]
    fn test_overlapping_aliases_are_rejected() {
        let result = AliasCatalog::compile(&[
            entry(CanonicalField::BasicSalary, &["LƯƠNG CB"], None),
            entry(CanonicalField::GrossIncome, &["LUONGCB"], None),
        ]);
        match result {
            Err(EngineError::AliasConflict { first, second, .. }) => {
                assert_eq!(first, CanonicalField::BasicSalary);
                assert_eq!(second, CanonicalField::GrossIncome);
            }
            other => panic!("Expected AliasConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_pair_tagged_for_same_section_is_rejected() {
        let result = AliasCatalog::compile(&[
            entry(
                CanonicalField::MealFeeIncome,
                &["TIỀN ĂN"],
                Some(Section::Income),
            ),
            entry(
                CanonicalField::MealFeeDeduction,
                &["TIỀN ĂN"],
                Some(Section::Income),
            ),
        ]);
        assert!(matches!(result, Err(EngineError::AliasConflict { .. })));
    }

    #[test]
    fn test_collision_prone_alias_needs_counterpart() {
        let result = AliasCatalog::compile(&[entry(
            CanonicalField::MealFeeIncome,
            &["TIỀN ĂN"],
            Some(Section::Income),
        )]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidAlias {
                field: CanonicalField::MealFeeIncome,
                ..
            })
        ));
    }

    #[test]
    fn test_blank_alias_is_rejected() {
        let result = AliasCatalog::compile(&[entry(CanonicalField::Note, &["--"], None)]);
        assert!(matches!(result, Err(EngineError::InvalidAlias { .. })));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result = AliasCatalog::compile(&[
            entry(CanonicalField::Note, &["GHI CHÚ"], None),
            entry(CanonicalField::Note, &["CHÚ THÍCH"], None),
        ]);
        assert!(matches!(result, Err(EngineError::InvalidAlias { .. })));
    }

    #[test]
    fn test_repeated_alias_within_one_entry_is_allowed() {
        let catalog = AliasCatalog::compile(&[entry(
            CanonicalField::Note,
            &["GHI CHÚ", "Ghi chu"],
            None,
        )])
        .unwrap();
        assert!(catalog.matches(CanonicalField::Note, "GHI CHU"));
    }

    #[test]
    fn test_matches_checks_single_field() {
        let catalog = AliasCatalog::compile(&[
            entry(CanonicalField::EmployeeCode, &["MSNV"], None),
            entry(CanonicalField::EmployeeName, &["HỌ VÀ TÊN"], None),
        ])
        .unwrap();
        assert!(catalog.matches(CanonicalField::EmployeeCode, "MSNV"));
        assert!(!catalog.matches(CanonicalField::EmployeeCode, "HO VA TEN"));
        assert!(!catalog.matches(CanonicalField::NetPay, "MSNV"));
        assert!(catalog.contains(CanonicalField::EmployeeName));
        assert!(!catalog.contains(CanonicalField::NetPay));
    }

    #[test]
    fn test_empty_label_never_resolves() {
        let catalog = AliasCatalog::compile(&meal_pair()).unwrap();
        assert_eq!(catalog.resolve(""), None);
    }

    #[test]
    fn test_layout_markers_are_normalized() {
        let layout = SheetLayout::compile(&LayoutConfig {
            group_markers: GroupMarkers {
                income: vec!["Thu nhập".to_string()],
                deduction: vec!["KHẤU TRỪ".to_string()],
            },
            unlabeled_group: Section::Income,
            header_scan_limit: 10,
            title: TitleConfig {
                template: "{month}/{year}".to_string(),
                fallback: "Payroll".to_string(),
            },
        })
        .unwrap();
        assert_eq!(layout.marker("THU NHAP"), Some(Section::Income));
        assert_eq!(layout.marker("KHAU TRU"), Some(Section::Deduction));
        assert_eq!(layout.marker("LUONG"), None);
        assert_eq!(layout.header_scan_limit(), 10);
    }

    #[test]
    fn test_layout_rejects_marker_in_both_sections() {
        let result = SheetLayout::compile(&LayoutConfig {
            group_markers: GroupMarkers {
                income: vec!["KHÁC".to_string()],
                deduction: vec!["khac".to_string()],
            },
            unlabeled_group: Section::Income,
            header_scan_limit: 10,
            title: TitleConfig {
                template: String::new(),
                fallback: String::new(),
            },
        });
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
