//! String normalization and tokenization used by every matcher.

/// Trim surrounding whitespace and lower-case. `None` becomes `""`.
pub fn normalize(s: Option<&str>) -> String {
    s.unwrap_or_default().trim().to_lowercase()
}

/// Normalize, then split into alphanumeric tokens.
///
/// Every character outside `[a-z0-9]` and whitespace acts as a separator.
/// Empty tokens are dropped.
pub fn tokenize(s: Option<&str>) -> Vec<String> {
    let cleaned: String = normalize(s)
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// True when `needle` is empty or a substring of `haystack`'s normalized form.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize(Some(haystack)).contains(needle)
}
