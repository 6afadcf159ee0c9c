//! Quote-aware keyword splitting

use once_cell::sync::Lazy;
use regex::Regex;

static KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|'([^']+)'|(\S+)"#).expect("valid regex"));

/// Split a query string into keywords
///
/// Text between matching double or single quotes stays one keyword, with
/// the quotes removed. Quotes nested inside the outer pair are kept as is.
///
/// ```
/// use ftindex_search::keyword_split;
///
/// assert_eq!(
///     keyword_split(r#"Hello I'm looking for "something special""#),
///     vec!["Hello", "I'm", "looking", "for", "something special"],
/// );
/// ```
pub fn keyword_split(keywords: &str) -> Vec<String> {
    KEYWORD_RE
        .captures_iter(keywords)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
        .collect()
}
