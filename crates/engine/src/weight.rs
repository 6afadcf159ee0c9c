//! Rank weight letters and the weight-value vector used when ranking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rank buckets
pub const BUCKET_COUNT: usize = 4;

/// Rank bucket of a lexeme position
///
/// Ordered so that `A > B > C > D`. Positions without an explicit weight
/// carry `D`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Weight {
    /// Lowest bucket, and the default
    #[default]
    D,
    /// Third bucket
    C,
    /// Second bucket
    B,
    /// Highest bucket
    A,
}

impl Weight {
    /// Every bucket, highest first
    pub const DESCENDING: [Weight; BUCKET_COUNT] = [Weight::A, Weight::B, Weight::C, Weight::D];

    /// Index into a `D, C, B, A` ordered array
    pub fn index(self) -> usize {
        match self {
            Weight::D => 0,
            Weight::C => 1,
            Weight::B => 2,
            Weight::A => 3,
        }
    }

    /// Letter form
    pub fn letter(self) -> char {
        match self {
            Weight::A => 'A',
            Weight::B => 'B',
            Weight::C => 'C',
            Weight::D => 'D',
        }
    }

    /// Parse a letter (case-insensitive)
    pub fn from_letter(c: char) -> Option<Weight> {
        match c.to_ascii_uppercase() {
            'A' => Some(Weight::A),
            'B' => Some(Weight::B),
            'C' => Some(Weight::C),
            'D' => Some(Weight::D),
            _ => None,
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Per-bucket multipliers, ordered `D, C, B, A`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightValues([f32; BUCKET_COUNT]);

impl WeightValues {
    /// Build from values ordered `D, C, B, A`
    pub fn new(values: [f32; BUCKET_COUNT]) -> Self {
        WeightValues(values)
    }

    /// Multiplier of one bucket
    pub fn get(&self, weight: Weight) -> f32 {
        self.0[weight.index()]
    }

    /// Values ordered `D, C, B, A`
    pub fn as_array(&self) -> [f32; BUCKET_COUNT] {
        self.0
    }
}

impl Default for WeightValues {
    /// `{0.1, 0.2, 0.4, 1.0}`, the usual engine default
    fn default() -> Self {
        WeightValues([0.1, 0.2, 0.4, 1.0])
    }
}
