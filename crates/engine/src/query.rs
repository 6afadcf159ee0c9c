//! Parsed text queries

use crate::vector::SearchVector;
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// A parsed text query
///
/// `Term` holds the lexemes of one user term; all of them must occur
/// (plain-query semantics). `Empty` comes from a term that produced no
/// lexeme (only stopwords or punctuation): it is dropped when combined
/// and matches nothing on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextQuery {
    /// No lexeme
    Empty,
    /// Every lexeme must occur
    Term(Vec<String>),
    /// Both sides must match
    And(Box<TextQuery>, Box<TextQuery>),
    /// Either side must match
    Or(Box<TextQuery>, Box<TextQuery>),
}

impl TextQuery {
    /// Build a term, `Empty` if there is no lexeme
    pub fn term<I, S>(lexemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for lexeme in lexemes {
            let lexeme = lexeme.into();
            if !out.contains(&lexeme) {
                out.push(lexeme);
            }
        }
        if out.is_empty() {
            TextQuery::Empty
        } else {
            TextQuery::Term(out)
        }
    }

    /// True for `Empty`
    pub fn is_empty(&self) -> bool {
        matches!(self, TextQuery::Empty)
    }

    /// Conjunction, ignoring empty sides
    pub fn and(self, other: TextQuery) -> TextQuery {
        match (self, other) {
            (TextQuery::Empty, q) | (q, TextQuery::Empty) => q,
            (a, b) => TextQuery::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction, ignoring empty sides
    pub fn or(self, other: TextQuery) -> TextQuery {
        match (self, other) {
            (TextQuery::Empty, q) | (q, TextQuery::Empty) => q,
            (a, b) => TextQuery::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Whether a vector matches
    pub fn matches(&self, vector: &SearchVector) -> bool {
        match self {
            TextQuery::Empty => false,
            TextQuery::Term(lexemes) => lexemes.iter().all(|l| vector.contains(l)),
            TextQuery::And(a, b) => a.matches(vector) && b.matches(vector),
            TextQuery::Or(a, b) => a.matches(vector) || b.matches(vector),
        }
    }

    /// Distinct lexemes, in query order
    pub fn lexemes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_lexemes(&mut out);
        out
    }

    fn collect_lexemes<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TextQuery::Empty => {}
            TextQuery::Term(lexemes) => {
                for lexeme in lexemes {
                    if !out.contains(&lexeme.as_str()) {
                        out.push(lexeme);
                    }
                }
            }
            TextQuery::And(a, b) | TextQuery::Or(a, b) => {
                a.collect_lexemes(out);
                b.collect_lexemes(out);
            }
        }
    }
}

impl BitAnd for TextQuery {
    type Output = TextQuery;

    fn bitand(self, rhs: TextQuery) -> TextQuery {
        self.and(rhs)
    }
}

impl BitOr for TextQuery {
    type Output = TextQuery;

    fn bitor(self, rhs: TextQuery) -> TextQuery {
        self.or(rhs)
    }
}

impl fmt::Display for TextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextQuery::Empty => Ok(()),
            TextQuery::Term(lexemes) => {
                let parts: Vec<String> = lexemes
                    .iter()
                    .map(|l| format!("'{}'", l.replace('\'', "''")))
                    .collect();
                if parts.len() > 1 {
                    write!(f, "( {} )", parts.join(" & "))
                } else {
                    f.write_str(&parts.join(""))
                }
            }
            TextQuery::And(a, b) => write!(f, "{} & {}", a, b),
            TextQuery::Or(a, b) => write!(f, "( {} | {} )", a, b),
        }
    }
}
