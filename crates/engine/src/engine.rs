//! The linguistic engine boundary
//!
//! The search layer only needs four capabilities from a full-text engine:
//! turn text into a weighted search vector, parse a user term into a text
//! query, rank a vector against a query, and tell which linguistic
//! configurations exist. `TextEngine` names them; `StandardEngine` is the
//! in-process implementation.

use crate::query::TextQuery;
use crate::rank;
use crate::tokenizer::tokenize;
use crate::vector::SearchVector;
use crate::weight::{Weight, WeightValues};
use ftindex_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TextConfig
// ============================================================================

/// Built-in linguistic configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextConfig {
    /// Lowercased words, no stopwords, no stemming
    Simple,
    /// Stopwords removed, possessives stripped, suffixes stemmed
    English,
}

impl TextConfig {
    /// Every built-in configuration
    pub const ALL: [TextConfig; 2] = [TextConfig::Simple, TextConfig::English];

    /// Configuration name as stored in index entries
    pub fn name(self) -> &'static str {
        match self {
            TextConfig::Simple => "simple",
            TextConfig::English => "english",
        }
    }
}

impl fmt::Display for TextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TextConfig::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::configuration(format!("text search configuration {:?} does not exist", s))
            })
    }
}

// ============================================================================
// TextEngine
// ============================================================================

/// Capabilities of a full-text engine
pub trait TextEngine: Send + Sync {
    /// Whether `config` names a known linguistic configuration
    fn has_config(&self, config: &str) -> bool;

    /// Tokenize `text` into an unweighted (bucket `D`) vector
    fn to_vector(&self, config: &str, text: &str) -> Result<SearchVector>;

    /// Parse one user term into a query whose lexemes must all occur
    fn parse_query(&self, config: &str, term: &str) -> Result<TextQuery>;

    /// Tokenize `text` with every position in `weight`
    fn weighted_vector(&self, config: &str, text: &str, weight: Weight) -> Result<SearchVector> {
        Ok(self.to_vector(config, text)?.with_weight(weight))
    }

    /// Concatenate weighted fragments into one document vector
    fn document(&self, config: &str, fragments: &[(String, Weight)]) -> Result<SearchVector> {
        let mut doc = SearchVector::new();
        for (text, weight) in fragments {
            doc = doc.concat(&self.weighted_vector(config, text, *weight)?);
        }
        Ok(doc)
    }

    /// Rank a vector against a query
    fn rank(&self, vector: &SearchVector, query: &TextQuery, weights: &WeightValues) -> f32 {
        rank::rank(vector, query, weights)
    }
}

/// In-process engine with the built-in configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEngine;

impl StandardEngine {
    /// Create the engine
    pub fn new() -> Self {
        StandardEngine
    }

    fn config(&self, name: &str) -> Result<TextConfig> {
        name.parse()
    }
}

impl TextEngine for StandardEngine {
    fn has_config(&self, config: &str) -> bool {
        self.config(config).is_ok()
    }

    fn to_vector(&self, config: &str, text: &str) -> Result<SearchVector> {
        let config = self.config(config)?;
        Ok(SearchVector::from_lexemes(tokenize(config, text), Weight::D))
    }

    fn parse_query(&self, config: &str, term: &str) -> Result<TextQuery> {
        let config = self.config(config)?;
        Ok(TextQuery::term(tokenize(config, term)))
    }
}
