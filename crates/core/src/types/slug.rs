//! URL slugs derived from product names.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Runs of anything outside `[a-z0-9]`.
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

/// Combining diacritical marks block (U+0300..=U+036F).
const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

/// Derive a slug from a display name.
///
/// Lowercases, decomposes accented characters and drops the combining marks,
/// collapses every run of non-`[a-z0-9]` characters into one hyphen, then
/// trims a leading and a trailing hyphen.
///
/// The result is stable under re-application: `slugify(&slugify(x)) == slugify(x)`.
///
/// ```
/// # use fratelli_core::slugify;
/// assert_eq!(slugify("Crème Brûlée!"), "creme-brulee");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let hyphenated = NON_ALNUM_RE.replace_all(&folded, "-");
    let trimmed = hyphenated.strip_prefix('-').unwrap_or(&hyphenated);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}
