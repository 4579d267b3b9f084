//! Naming grammar for generated objects and procedures
//!
//! - Test procedures: `T` + 4-digit id + `_` + PascalCase title (80 chars max)
//! - Codeunits: `<Stem>Tests<affix>FDW`, never longer than 30 characters

use once_cell::sync::Lazy;
use regex::Regex;

/// AL object names are limited to 30 characters
pub const MAX_OBJECT_NAME_LEN: usize = 30;

/// Longest PascalCase title kept in a procedure name
pub const MAX_TITLE_LEN: usize = 80;

/// Stem used when the work item yields no usable words
pub const FALLBACK_STEM: &str = "Atdd";

static WORK_ITEM_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*[-:]\s*").unwrap());

/// `Word` from `wORD`: first character upper-cased, the rest lower-cased
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Keep ASCII letters, digits and whitespace
fn alphanumeric_words(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// PascalCase join of the first `max_words` words of `text`
#[must_use]
pub fn pascal_case(text: &str, max_words: usize) -> String {
    alphanumeric_words(text)
        .split_whitespace()
        .take(max_words)
        .map(capitalize)
        .collect()
}

/// Test procedure name for a scenario
///
/// ```rust
/// assert_eq!(atdd_codegen::procedure_name(7, "Create New Vendor!"), "T0007_CreateNewVendor");
/// ```
#[must_use]
pub fn procedure_name(id: u32, title: &str) -> String {
    let mut name = pascal_case(title, usize::MAX);
    name.truncate(MAX_TITLE_LEN);
    format!("T{id:04}_{name}")
}

/// `Tests<affix>FDW`
#[inline]
#[must_use]
pub fn name_suffix(affix: &str) -> String {
    format!("Tests{affix}FDW")
}

/// Codeunit name derived from a work item title
///
/// Drops a leading `<digits> - ` or `<digits>: `, keeps the first three
/// words and truncates the stem so the whole name fits in
/// [`MAX_OBJECT_NAME_LEN`].
#[must_use]
pub fn codeunit_name(work_item: &str, affix: &str) -> String {
    let suffix = name_suffix(affix);
    let title = WORK_ITEM_PREFIX.replace(work_item.trim(), "");
    let mut stem = pascal_case(&title, 3);
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    stem.truncate(MAX_OBJECT_NAME_LEN.saturating_sub(suffix.len()));
    format!("{stem}{suffix}")
}

/// Plain AL identifier (usable without quotes)
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn procedure_names() {
        assert_eq!(procedure_name(7, "Create New Vendor!"), "T0007_CreateNewVendor");
        assert_eq!(procedure_name(12, "  post ATDD   invoice "), "T0012_PostAtddInvoice");
        assert_eq!(procedure_name(1, ""), "T0001_");
    }

    #[test]
    fn procedure_name_truncates_title() {
        let title = "word ".repeat(40);
        let name = procedure_name(1, &title);
        assert_eq!(name.len(), "T0001_".len() + MAX_TITLE_LEN);
    }

    #[test]
    fn duplicate_titles_collapse_to_same_name() {
        assert_eq!(
            procedure_name(1, "Post invoice!"),
            procedure_name(1, "Post, invoice")
        );
    }

    #[test]
    fn codeunit_name_from_work_item() {
        assert_eq!(
            codeunit_name("330789 - Approved supplier list enforcement", "182"),
            "ApprovedSupplierLisTests182FDW"
        );
        assert_eq!(codeunit_name("42: vendor card", "182"), "VendorCardTests182FDW");
        assert_eq!(codeunit_name("", "182"), "AtddTests182FDW");
        assert_eq!(codeunit_name("!!!", "7"), "AtddTests7FDW");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("LibraryApprovedSupplier182FDW"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("Library - Assert"));
        assert!(!is_identifier(""));
    }

    proptest! {
        #[test]
        fn derived_names_fit_object_limit(work_item in ".{0,120}", affix in "[0-9]{0,6}") {
            let name = codeunit_name(&work_item, &affix);
            prop_assert!(name.len() <= MAX_OBJECT_NAME_LEN);
            prop_assert!(name.ends_with(&name_suffix(&affix)));
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }

        #[test]
        fn procedure_names_keep_prefix(id in 1u32..=9999, title in ".{0,200}") {
            let name = procedure_name(id, &title);
            let expected_prefix = format!("T{id:04}_");
            prop_assert!(name.starts_with(&expected_prefix));
            prop_assert!(name.len() <= expected_prefix.len() + MAX_TITLE_LEN);
        }
    }
}
