//! String helpers.

/// Returns `None` for missing, empty or whitespace-only values.
///
/// Region keys coming back from the world API are sometimes `""` rather than
/// `null`; both mean "no region".
///
/// # Examples
///
/// ```
/// use realmward_domain::common::non_blank;
///
/// assert_eq!(non_blank(Some("town_a")), Some("town_a"));
/// assert_eq!(non_blank(Some("  ")), None);
/// assert_eq!(non_blank(None), None);
/// ```
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Truncates to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters, not bytes, so multi-byte text is never split.
///
/// # Examples
///
/// ```
/// use realmward_domain::common::truncate_chars;
///
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("hello world", 5), "hello...");
/// ```
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_rejects_whitespace() {
        assert_eq!(non_blank(Some("\t\n")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some(" a ")), Some(" a "));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
