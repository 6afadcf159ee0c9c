//! Unicode folding applied to indexed text and query strings
//!
//! 1. NFD normalize (decompose characters into base + combining marks)
//! 2. Drop combining marks
//! 3. Expand letters that have no canonical decomposition (`ß`, `æ`, `ø`, ...)
//!
//! Case is preserved; lowercasing belongs to the tokenizer.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn expand(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'ẞ' => "SS",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ð' => "d",
        'Ð' => "D",
        'ı' => "i",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        _ => return None,
    })
}

/// Fold `text` to its closest ASCII spelling where one exists
///
/// # Example
///
/// ```
/// use ftindex_engine::transliterate;
///
/// assert_eq!(transliterate("Crème Brûlée"), "Creme Brulee");
/// assert_eq!(transliterate("Straße"), "Strasse");
/// ```
pub fn transliterate(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        match expand(c) {
            Some(s) => out.push_str(s),
            None => out.push(c),
        }
    }
    out
}
