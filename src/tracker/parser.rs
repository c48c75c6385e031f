/// Extract the issue total from the text of the search results counter,
/// e.g. `"Showing 1-50 of 123"` → 123.
///
/// Missing or empty text, and text that does not end in digits, count as 0.
pub fn parse_issue_count(text: Option<&str>) -> u64 {
    let Some(text) = text.map(str::trim_end).filter(|t| !t.is_empty()) else {
        return 0;
    };

    let digits_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_start {
        Some(start) => text[start..].parse().unwrap_or_else(|_| {
            tracing::warn!("Issue count `{}` does not fit in 64 bits", &text[start..]);
            0
        }),
        None => {
            tracing::debug!("No trailing count in `{}`", text);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_empty_text_is_zero() {
        assert_eq!(parse_issue_count(None), 0);
        assert_eq!(parse_issue_count(Some("")), 0);
        assert_eq!(parse_issue_count(Some("   ")), 0);
    }

    #[test]
    fn test_trailing_digits() {
        assert_eq!(parse_issue_count(Some("Showing 1-50 of 123")), 123);
        assert_eq!(parse_issue_count(Some("1 of 1")), 1);
        assert_eq!(parse_issue_count(Some("42")), 42);
        assert_eq!(parse_issue_count(Some("Showing 1-50 of 9,876\n")), 876);
    }

    #[test]
    fn test_text_without_trailing_digits_is_zero() {
        assert_eq!(parse_issue_count(Some("No issues were found")), 0);
        assert_eq!(parse_issue_count(Some("99999999999999999999999")), 0);
    }
}
