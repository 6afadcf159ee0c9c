//! Linguistic engine for ftindex
//!
//! This crate is the full-text engine the search layer treats as a black box:
//! - Weight / WeightValues: the four rank buckets and their ranking multipliers
//! - SearchVector: lexemes with weighted positions, concatenable
//! - TextQuery: parsed queries combined with AND / OR
//! - TextEngine: vector building, query parsing and ranking per configuration
//! - transliterate: Unicode folding of indexed and queried text

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod query;
pub mod rank;
pub mod stemmer;
pub mod tokenizer;
pub mod transliterate;
pub mod vector;
pub mod weight;

pub use engine::{StandardEngine, TextConfig, TextEngine};
pub use query::TextQuery;
pub use transliterate::transliterate;
pub use vector::{Position, SearchVector};
pub use weight::{Weight, WeightValues, BUCKET_COUNT};
