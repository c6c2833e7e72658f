//! Flag key naming rules.
//!
//! Flag keys are written in hyphen-case (`base-dir`) because that is how
//! they appear on the command line. Commands receive them in camelCase
//! (`baseDir`).

/// Converts a hyphen-case key to camelCase.
///
/// Splits on `-`, keeps the first segment verbatim and uppercases the first
/// character of every later segment. Empty segments (from doubled hyphens)
/// contribute nothing, so the conversion is only lossless for keys without
/// consecutive hyphens.
///
/// # Examples
///
/// ```
/// use cmdtree_core::to_camel_case;
///
/// assert_eq!(to_camel_case("base-dir"), "baseDir");
/// assert_eq!(to_camel_case("case-insensitive-match"), "caseInsensitiveMatch");
/// assert_eq!(to_camel_case("username"), "username");
/// ```
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut segments = key.split('-');
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Returns `true` if `key` is lowercase alphanumeric segments joined by
/// single hyphens.
///
/// # Examples
///
/// ```
/// use cmdtree_core::is_hyphen_case;
///
/// assert!(is_hyphen_case("output-dir"));
/// assert!(is_hyphen_case("v2"));
/// assert!(!is_hyphen_case("output--dir"));
/// assert!(!is_hyphen_case("-output"));
/// assert!(!is_hyphen_case("outputDir"));
/// ```
pub fn is_hyphen_case(key: &str) -> bool {
    !key.is_empty()
        && key.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Returns `true` if `key` can be bound as a `--long` flag.
///
/// Looser than [`is_hyphen_case`]: uppercase letters are allowed, but the
/// key must not start or end with a hyphen or contain `--`.
pub(crate) fn is_valid_flag_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('-')
        && !key.ends_with('-')
        && !key.contains("--")
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
