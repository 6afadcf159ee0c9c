//! Weighted search vectors
//!
//! A `SearchVector` maps each normalized lexeme to the positions it occurs
//! at. Every position carries a rank weight. Concatenation shifts the
//! positions of the right operand past the last position of the left one,
//! so a document built from several fragments keeps them in order.

use crate::weight::Weight;
use std::collections::BTreeMap;
use std::fmt;

/// Highest representable position; later positions are clamped
pub const MAX_POSITION: u32 = 16383;

/// One occurrence of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 1-based word offset within the document
    pub offset: u32,
    /// Rank bucket of the fragment this occurrence came from
    pub weight: Weight,
}

/// Lexeme to positions map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchVector {
    lexemes: BTreeMap<String, Vec<Position>>,
}

impl SearchVector {
    /// Empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from lexemes in document order, all at one weight
    pub fn from_lexemes<I, S>(lexemes: I, weight: Weight) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vector = SearchVector::new();
        for (i, lexeme) in lexemes.into_iter().enumerate() {
            let offset = u32::try_from(i + 1).unwrap_or(MAX_POSITION).min(MAX_POSITION);
            vector
                .lexemes
                .entry(lexeme.into())
                .or_default()
                .push(Position { offset, weight });
        }
        vector
    }

    /// True if the vector holds no lexeme
    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// Number of distinct lexemes
    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    /// Whether a lexeme occurs
    pub fn contains(&self, lexeme: &str) -> bool {
        self.lexemes.contains_key(lexeme)
    }

    /// Positions of a lexeme, in ascending offset order
    pub fn positions(&self, lexeme: &str) -> &[Position] {
        self.lexemes.get(lexeme).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate lexemes and their positions
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Position])> {
        self.lexemes.iter().map(|(l, p)| (l.as_str(), p.as_slice()))
    }

    /// Highest position offset, 0 when empty
    pub fn max_position(&self) -> u32 {
        self.lexemes
            .values()
            .filter_map(|positions| positions.last())
            .map(|p| p.offset)
            .max()
            .unwrap_or(0)
    }

    /// Set every position to `weight`
    pub fn with_weight(mut self, weight: Weight) -> Self {
        for positions in self.lexemes.values_mut() {
            for position in positions.iter_mut() {
                position.weight = weight;
            }
        }
        self
    }

    /// Concatenate `other` after `self`
    pub fn concat(&self, other: &SearchVector) -> SearchVector {
        let shift = self.max_position();
        let mut out = self.clone();
        for (lexeme, positions) in &other.lexemes {
            let target = out.lexemes.entry(lexeme.clone()).or_default();
            target.extend(positions.iter().map(|p| Position {
                offset: p.offset.saturating_add(shift).min(MAX_POSITION),
                weight: p.weight,
            }));
            target.sort();
            // clamping may have produced duplicate offsets
            target.dedup_by_key(|p| p.offset);
        }
        out
    }
}

impl fmt::Display for SearchVector {
    /// `'lexeme':1A,4 'other':2B`; weight `D` is implicit
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (lexeme, positions) in &self.lexemes {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "'{}'", lexeme.replace('\'', "''"))?;
            for (i, p) in positions.iter().enumerate() {
                f.write_str(if i == 0 { ":" } else { "," })?;
                write!(f, "{}", p.offset)?;
                if p.weight != Weight::D {
                    write!(f, "{}", p.weight)?;
                }
            }
        }
        Ok(())
    }
}
