//! Full-text search helpers for the public article listing.
//!
//! Ranking and matching are left to PostgreSQL (`to_tsvector` /
//! `to_tsquery`); this module only turns free-form user input into a safe
//! `tsquery` string.

/// Text-search configuration used on both sides of the match. `simple`
/// avoids English stemming on Norwegian text.
pub const TS_CONFIG: &str = "simple";

/// Maximum number of terms taken from a search query.
pub const MAX_QUERY_TERMS: usize = 10;

/// Split user input into terms suitable for tsquery construction.
///
/// - Any character that is not alphanumeric or `_` separates terms, so
///   tsquery operators (`&`, `|`, `!`, `:`, parentheses) never survive.
/// - Terms are lowercased; at most [`MAX_QUERY_TERMS`] are kept.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .take(MAX_QUERY_TERMS)
        .map(str::to_lowercase)
        .collect();

    if terms.is_empty() { None } else { Some(terms) }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// # Examples
///
/// ```
/// use newsdesk_core::search::build_tsquery;
/// assert_eq!(build_tsquery("rente fond"), Some("rente & fond".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Build a prefix tsquery for search-as-you-type: the last term matches
/// as a prefix.
///
/// ```
/// use newsdesk_core::search::build_prefix_tsquery;
/// assert_eq!(build_prefix_tsquery("indeks fo"), Some("indeks & fo:*".to_string()));
/// ```
pub fn build_prefix_tsquery(query: &str) -> Option<String> {
    let mut terms = sanitize_terms(query)?;
    if let Some(last) = terms.last_mut() {
        last.push_str(":*");
    }
    Some(terms.join(" & "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsquery_single_term() {
        assert_eq!(build_tsquery("aksjer"), Some("aksjer".to_string()));
    }

    #[test]
    fn tsquery_multiple_terms_joined_with_and() {
        assert_eq!(
            build_tsquery("billige fond"),
            Some("billige & fond".to_string())
        );
    }

    #[test]
    fn tsquery_operators_are_stripped() {
        assert_eq!(
            build_tsquery("rente & (fond | !aksje):*"),
            Some("rente & fond & aksje".to_string())
        );
    }

    #[test]
    fn tsquery_keeps_non_ascii_letters() {
        assert_eq!(
            build_tsquery("Str\u{f8}m-pris"),
            Some("str\u{f8}m & pris".to_string())
        );
    }

    #[test]
    fn tsquery_empty_returns_none() {
        assert_eq!(build_tsquery(""), None);
        assert_eq!(build_tsquery(" ?! "), None);
    }

    #[test]
    fn tsquery_term_count_is_capped() {
        let query = (0..20).map(|i| format!("t{i}")).collect::<Vec<_>>().join(" ");
        let built = build_tsquery(&query).unwrap();
        assert_eq!(built.split(" & ").count(), MAX_QUERY_TERMS);
    }

    #[test]
    fn prefix_marks_last_term_only() {
        assert_eq!(build_prefix_tsquery("spa"), Some("spa:*".to_string()));
        assert_eq!(
            build_prefix_tsquery("the quick fo"),
            Some("the & quick & fo:*".to_string())
        );
        assert_eq!(build_prefix_tsquery(""), None);
    }
}
