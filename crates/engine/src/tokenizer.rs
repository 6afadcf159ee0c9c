//! Lexeme extraction for the built-in configurations
//!
//! Both configurations split on UAX#29 word boundaries, drop punctuation
//! inside a word and lowercase. `english` additionally strips possessives,
//! discards one-letter words and stopwords, then stems.

use crate::engine::TextConfig;
use crate::stemmer;
use unicode_segmentation::UnicodeSegmentation;

/// Snowball English stopwords, sorted for binary search
const ENGLISH_STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

fn is_english_stopword(lexeme: &str) -> bool {
    ENGLISH_STOPWORDS.binary_search(&lexeme).is_ok()
}

fn without_possessive(word: &str) -> &str {
    ["'s", "\u{2019}s"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
        .unwrap_or(word)
}

fn fold(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lexemes of `text` in document order, duplicates kept
///
/// ```
/// use ftindex_engine::tokenizer::tokenize;
/// use ftindex_engine::TextConfig;
///
/// assert_eq!(tokenize(TextConfig::Simple, "The Quick Fox"), vec!["the", "quick", "fox"]);
/// assert_eq!(tokenize(TextConfig::English, "The Quick Foxes"), vec!["quick", "fox"]);
/// ```
pub fn tokenize(config: TextConfig, text: &str) -> Vec<String> {
    let words = text.unicode_words();
    match config {
        TextConfig::Simple => words.map(fold).filter(|w| !w.is_empty()).collect(),
        TextConfig::English => words
            .map(|w| fold(without_possessive(w)))
            .filter(|w| w.chars().count() > 1 && !is_english_stopword(w))
            .map(|w| stemmer::stem(&w))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopword_list_is_sorted() {
        assert!(ENGLISH_STOPWORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_simple_lowercases_only() {
        assert_eq!(tokenize(TextConfig::Simple, "I am a Test"), vec!["i", "am", "a", "test"]);
        assert_eq!(tokenize(TextConfig::Simple, "Running Tests"), vec!["running", "tests"]);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        assert_eq!(
            tokenize(TextConfig::Simple, "rust and rust"),
            vec!["rust", "and", "rust"]
        );
    }

    #[test]
    fn test_nothing_to_index() {
        assert!(tokenize(TextConfig::Simple, "").is_empty());
        assert!(tokenize(TextConfig::Simple, "... -- !!").is_empty());
        assert!(tokenize(TextConfig::English, "The AND Not").is_empty());
    }

    #[test]
    fn test_english_drops_stopwords_and_stems() {
        assert_eq!(tokenize(TextConfig::English, "the quick and the dead"), vec!["quick", "dead"]);
        assert_eq!(tokenize(TextConfig::English, "running quickly"), vec!["run", "quickli"]);
        assert_eq!(tokenize(TextConfig::English, "adjustments"), vec!["adjust"]);
    }

    #[test]
    fn test_apostrophes() {
        // "don't" is one word; the apostrophe is dropped
        assert_eq!(tokenize(TextConfig::English, "don't stop"), vec!["dont", "stop"]);
        assert_eq!(tokenize(TextConfig::English, "Ada's book"), vec!["ada", "book"]);
        assert_eq!(tokenize(TextConfig::English, "Ada\u{2019}s book"), vec!["ada", "book"]);
    }

    #[test]
    fn test_hyphenated_words_split() {
        assert_eq!(
            tokenize(TextConfig::Simple, "state-of-the-art"),
            vec!["state", "of", "the", "art"]
        );
    }
}
