//! Employee identity validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which identifier space a record's identifier was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMatch {
    /// The identifier is a known employee code.
    EmployeeCode,
    /// The identifier is a known login name.
    LoginName,
}

/// The identifiers an import accepts.
///
/// Both sets are compared case-insensitively after trimming.
///
/// # Example
///
/// ```
/// use payroll_ingest::ingest::{IdentityMatch, ValidIdentifiers};
///
/// let valid = ValidIdentifiers::new(["E001"], ["an.nguyen"]);
/// assert_eq!(valid.check(Some(" e001 ")), Some(IdentityMatch::EmployeeCode));
/// assert_eq!(valid.check(Some("AN.NGUYEN")), Some(IdentityMatch::LoginName));
/// assert_eq!(valid.check(Some("E999")), None);
/// assert_eq!(valid.check(None), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidIdentifiers {
    employee_codes: HashSet<String>,
    login_names: HashSet<String>,
}

impl ValidIdentifiers {
    /// Builds the identifier sets.
    pub fn new<C, L>(employee_codes: C, login_names: L) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            employee_codes: fold_all(employee_codes),
            login_names: fold_all(login_names),
        }
    }

    /// Looks an identifier up, employee codes first.
    pub fn check(&self, identifier: Option<&str>) -> Option<IdentityMatch> {
        let key = fold(identifier?);
        if key.is_empty() {
            return None;
        }
        if self.employee_codes.contains(&key) {
            Some(IdentityMatch::EmployeeCode)
        } else if self.login_names.contains(&key) {
            Some(IdentityMatch::LoginName)
        } else {
            None
        }
    }

    /// Total number of known identifiers.
    pub fn len(&self) -> usize {
        self.employee_codes.len() + self.login_names.len()
    }

    /// Returns true if no identifier is accepted.
    pub fn is_empty(&self) -> bool {
        self.employee_codes.is_empty() && self.login_names.is_empty()
    }
}

fn fold(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

fn fold_all<I>(identifiers: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    identifiers
        .into_iter()
        .map(|id| fold(id.as_ref()))
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_checked_before_logins() {
        let valid = ValidIdentifiers::new(["shared"], ["SHARED"]);
        assert_eq!(valid.check(Some("Shared")), Some(IdentityMatch::EmployeeCode));
    }

    #[test]
    fn test_blank_identifier_never_matches() {
        let valid = ValidIdentifiers::new(["", "  "], Vec::<String>::new());
        assert!(valid.is_empty());
        assert_eq!(valid.check(Some("  ")), None);
    }

    #[test]
    fn test_vietnamese_identifiers_fold_case() {
        let valid = ValidIdentifiers::new(Vec::<&str>::new(), ["ĐỨC.TRẦN"]);
        assert_eq!(valid.check(Some("đức.trần")), Some(IdentityMatch::LoginName));
        assert_eq!(valid.len(), 1);
    }
}
