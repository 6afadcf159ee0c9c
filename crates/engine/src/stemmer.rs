//! Porter stemmer for the `english` configuration
//!
//! The five rewrite steps of Porter (1980) over lowercase ASCII words:
//!
//! ```text
//! 1  plurals, -ed/-ing, terminal y → i      caresses → caress, running → run
//! 2  double suffixes                         relational → relate
//! 3  -ic-, -full, -ness                      hopefulness → hope
//! 4  -ant, -ence, -ment, ... when m > 1      adjustment → adjust
//! 5  final -e, -ll when m > 1                probate → probat, controll → control
//! ```
//!
//! `m` is the measure of a stem: the number of vowel-consonant runs in
//! `[C](VC)^m[V]`. In each of steps 2 to 4 only the longest matching suffix
//! is considered; if its condition fails the word is left as is.
//! Words of two letters or fewer, and words with non-ASCII letters, are
//! returned unchanged.

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

fn measure(w: &[u8]) -> usize {
    let n = w.len();
    let mut i = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }
    let mut m = 0;
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i == n {
            return m;
        }
        m += 1;
        while i < n && is_consonant(w, i) {
            i += 1;
        }
    }
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant, the last not w, x or y
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

/// Stem left when `suffix` is cut off `w`
fn stem_of<'a>(w: &'a [u8], suffix: &str) -> Option<&'a [u8]> {
    w.strip_suffix(suffix.as_bytes())
}

fn step1a(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        // sses → ss, ies → i
        w.truncate(w.len() - 2);
    } else if !w.ends_with(b"ss") && w.ends_with(b"s") {
        w.pop();
    }
}

fn step1b(w: &mut Vec<u8>) {
    if let Some(stem) = stem_of(w, "eed") {
        if measure(stem) > 0 {
            w.pop();
        }
        return;
    }
    let cut = ["ed", "ing"].iter().find_map(|suffix| {
        let stem = stem_of(w.as_slice(), suffix)?;
        has_vowel(stem).then_some(stem.len())
    });
    let Some(len) = cut else {
        return;
    };
    w.truncate(len);

    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_double_consonant(w) && !matches!(w.last(), Some(b'l' | b's' | b'z')) {
        w.pop();
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

fn step1c(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && has_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

/// Replace the longest listed suffix when its stem has `m > 0`
fn replace_longest(w: &mut Vec<u8>, rules: &[(&str, &str)]) {
    let rule = rules
        .iter()
        .filter(|(suffix, _)| w.ends_with(suffix.as_bytes()))
        .max_by_key(|(suffix, _)| suffix.len());
    if let Some((suffix, replacement)) = rule {
        let stem_len = w.len() - suffix.len();
        if measure(&w[..stem_len]) > 0 {
            w.truncate(stem_len);
            w.extend_from_slice(replacement.as_bytes());
        }
    }
}

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Drop the longest residual suffix when `m > 1`; "ion" only after s or t
fn step4(w: &mut Vec<u8>) {
    let Some(suffix) = STEP4
        .iter()
        .filter(|suffix| w.ends_with(suffix.as_bytes()))
        .max_by_key(|suffix| suffix.len())
    else {
        return;
    };
    let stem_len = w.len() - suffix.len();
    let stem = &w[..stem_len];
    let ion_ok = *suffix != "ion" || matches!(stem.last(), Some(b's' | b't'));
    if ion_ok && measure(stem) > 1 {
        w.truncate(stem_len);
    }
}

fn step5(w: &mut Vec<u8>) {
    if w.ends_with(b"e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }
    if measure(w) > 1 && ends_double_consonant(w) && w.ends_with(b"l") {
        w.pop();
    }
}

/// Porter stem of a lowercase word
pub fn stem(word: &str) -> String {
    if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        return word.to_string();
    }
    let mut w = word.as_bytes().to_vec();
    step1a(&mut w);
    step1b(&mut w);
    step1c(&mut w);
    replace_longest(&mut w, STEP2);
    replace_longest(&mut w, STEP3);
    step4(&mut w);
    step5(&mut w);
    // only ASCII bytes were ever written
    String::from_utf8_lossy(&w).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_stems(cases: &[(&str, &str)]) {
        for (word, expected) in cases {
            assert_eq!(stem(word), *expected, "stem({word})");
        }
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure(b"tr"), 0);
        assert_eq!(measure(b"tree"), 0);
        assert_eq!(measure(b"trouble"), 1);
        assert_eq!(measure(b"oats"), 1);
        assert_eq!(measure(b"troubles"), 2);
        assert_eq!(measure(b"private"), 2);
    }

    #[test]
    fn test_y_depends_on_preceding_letter() {
        // after a vowel y is a consonant, after a consonant a vowel
        assert!(is_consonant(b"toy", 2));
        assert!(!is_consonant(b"syzygy", 1));
    }

    #[test]
    fn test_step1() {
        assert_stems(&[
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("caress", "caress"),
            ("cats", "cat"),
            ("feed", "feed"),
            ("agreed", "agre"),
            ("plastered", "plaster"),
            ("bled", "bled"),
            ("motoring", "motor"),
            ("sing", "sing"),
            ("conflated", "conflat"),
            ("hopping", "hop"),
            ("falling", "fall"),
            ("filing", "file"),
            ("happy", "happi"),
            ("sky", "sky"),
        ]);
    }

    #[test]
    fn test_suffix_steps() {
        assert_stems(&[
            ("relational", "relat"),
            ("conditional", "condit"),
            ("hopefulness", "hope"),
            ("triplicate", "triplic"),
            ("adjustment", "adjust"),
            ("adoption", "adopt"),
            ("probate", "probat"),
            ("controlling", "control"),
            ("generalization", "gener"),
        ]);
    }

    #[test]
    fn test_longest_suffix_decides() {
        // "ement" leaves "agr" (m = 1); shorter "ment"/"ent" are not tried
        assert_eq!(stem("agreement"), "agreement");
    }

    #[test]
    fn test_inflections_share_a_stem() {
        for word in ["search", "searches", "searched", "searching"] {
            assert_eq!(stem(word), "search");
        }
        for word in ["run", "runs", "running"] {
            assert_eq!(stem(word), "run");
        }
    }

    #[test]
    fn test_left_alone() {
        assert_stems(&[("is", "is"), ("as", "as"), ("cafés", "cafés"), ("r2d2", "r2d2")]);
    }
}
