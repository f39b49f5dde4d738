//! Phone field parsing.
//!
//! A guest's `CELULAR` cell is free text that may hold several numbers
//! (a couple sharing one row, e.g. `"987654321; 912345678"`). Each
//! maximal run of ASCII digits becomes one send target.

use std::sync::LazyLock;

use regex::Regex;

use crate::guest::PHONE_ABSENT_MARKERS;

/// Default country code prefixed to every extracted number.
pub const DEFAULT_COUNTRY_CODE: &str = "+51";

/// Phone fields shorter than this are treated as absent.
pub const MIN_PHONE_FIELD_LENGTH: usize = 6;

/// Maximal runs of ASCII digits.
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Extract send targets from a phone field.
///
/// Returns an empty list (the skip signal) when the field is absent,
/// shorter than [`MIN_PHONE_FIELD_LENGTH`] characters, equal to one of
/// `null`/`none`/`nan` in any case, or contains no digits.
///
/// ```
/// use guestlist_core::phone::parse_phone_targets;
///
/// assert_eq!(
///     parse_phone_targets(Some("987654321; 912345678"), "+51"),
///     vec!["+51987654321", "+51912345678"],
/// );
/// assert!(parse_phone_targets(Some("NULL"), "+51").is_empty());
/// ```
pub fn parse_phone_targets(field: Option<&str>, country_code: &str) -> Vec<String> {
    let Some(text) = field else {
        return Vec::new();
    };
    if text.chars().count() < MIN_PHONE_FIELD_LENGTH {
        return Vec::new();
    }
    let lowered = text.to_lowercase();
    if PHONE_ABSENT_MARKERS.contains(&lowered.as_str()) {
        return Vec::new();
    }

    DIGIT_RUN_RE
        .find_iter(text)
        .map(|m| format!("{country_code}{}", m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(field: &str) -> Vec<String> {
        parse_phone_targets(Some(field), DEFAULT_COUNTRY_CODE)
    }

    #[test]
    fn two_numbers_in_one_field() {
        assert_eq!(
            targets("987654321; 912345678"),
            vec!["+51987654321", "+51912345678"]
        );
    }

    #[test]
    fn single_number_with_spaces_splits_on_spaces() {
        // Every digit run is its own target; spaced-out numbers are not joined.
        assert_eq!(targets("987 654 321"), vec!["+51987", "+51654", "+51321"]);
    }

    #[test]
    fn absent_field() {
        assert!(parse_phone_targets(None, DEFAULT_COUNTRY_CODE).is_empty());
    }

    #[test]
    fn sentinels_in_any_case() {
        for field in ["NULL", "null", "None", "NONE", "nan", "NaN"] {
            assert!(targets(field).is_empty(), "{field} should be skipped");
        }
    }

    #[test]
    fn empty_and_short_fields() {
        assert!(targets("").is_empty());
        assert!(targets("abcd").is_empty());
        assert!(targets("12345").is_empty());
    }

    #[test]
    fn long_field_without_digits() {
        assert!(targets("sin celular").is_empty());
    }

    #[test]
    fn custom_country_code() {
        assert_eq!(
            parse_phone_targets(Some("612345678"), "+34"),
            vec!["+34612345678"]
        );
    }
}
