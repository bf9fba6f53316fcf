//! Text normalization for header and cell comparison.
//!
//! Header labels on hand-made sheets differ in accents, case, punctuation and
//! spacing. [`normalize_text`] folds all of that away so that labels can be
//! compared as plain keys.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes text into a comparison key.
///
/// The text is decomposed, combining marks are dropped, `Đ`/`đ` fold to `D`,
/// letters are uppercased and every run of characters that are not letters
/// or digits becomes a single space. Leading and trailing separators are
/// removed. The function is total and idempotent.
///
/// # Examples
///
/// ```
/// use payroll_ingest::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Họ và tên "), "HO VA TEN");
/// assert_eq!(normalize_text("Lương CB (VNĐ)"), "LUONG CB VND");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    let folded = input
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| match ch {
            'Đ' | 'đ' => 'D',
            other => other,
        })
        .flat_map(char::to_uppercase);

    for ch in folded {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(' ');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Returns true when the text has no visible content.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Removes the separators from an already normalized key.
///
/// Two labels with the same compact key are indistinguishable to a
/// whitespace-tolerant matcher.
pub fn compact_key(normalized: &str) -> String {
    normalized.chars().filter(|ch| !ch.is_whitespace()).collect()
}
