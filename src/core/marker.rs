//! Recognition of the legacy `@ngInject` doc tag and the directive that replaces it.

use std::sync::LazyLock;

use regex::Regex;

/// The legacy doc tag marking a function for dependency injection.
pub const MARKER_TAG: &str = "@ngInject";

/// A comment (or comment line) holding nothing but the tag and punctuation,
/// e.g. `* @ngInject` or ` @ngInject */`.
static PURE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\W*@ngInject\W*$").unwrap());

static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*("ngInject"|'ngInject')"#).unwrap());

/// Check whether `text` mentions the tag anywhere, ignoring case.
pub fn contains_marker(text: &str) -> bool {
    text.to_ascii_lowercase()
        .contains(&MARKER_TAG.to_ascii_lowercase())
}

/// Check whether `text` is made of the tag alone.
pub fn is_pure_marker(text: &str) -> bool {
    PURE_MARKER_REGEX.is_match(text)
}

/// Check whether `text` starts with the directive string, in either quote style.
pub fn starts_with_directive(text: &str) -> bool {
    DIRECTIVE_REGEX.is_match(text)
}

/// The directive statement, e.g. `"ngInject";`.
pub fn directive(quote_char: char) -> String {
    format!("{quote_char}ngInject{quote_char};")
}
