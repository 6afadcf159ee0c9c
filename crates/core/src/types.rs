//! Identifiers for indexed objects
//!
//! - `ContentType`: the concrete record type of an object (e.g. `"blog.BlogPage"`)
//! - `PrimaryKey`: typed primary key of a live object
//! - `PkKind`: declared primary-key kind of a model, used to cast stored
//!   object ids (always text in the index) back into typed keys

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ContentType
// ============================================================================

/// Identifies the concrete record type of an indexed object
///
/// Index entries reference their object through `(content_type, object_id)`,
/// which supports polymorphic lookups across unrelated tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// Create a content type from its label
    pub fn new(label: impl Into<String>) -> Self {
        ContentType(label.into())
    }

    /// The label, e.g. `"blog.BlogPage"`
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(label: &str) -> Self {
        ContentType::new(label)
    }
}

impl From<String> for ContentType {
    fn from(label: String) -> Self {
        ContentType(label)
    }
}

// ============================================================================
// PrimaryKey
// ============================================================================

/// Declared primary-key kind of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PkKind {
    /// Integer keys (auto increment)
    #[default]
    Int,
    /// Text keys (slugs, UUIDs, ...)
    Text,
}

/// Typed primary key of a live object
///
/// Primary keys are not assumed to be integers. The index stores them as
/// text (`object_id()`); `parse()` casts them back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    /// Integer key
    Int(i64),
    /// Text key
    Text(String),
}

impl PrimaryKey {
    /// Text form stored in `IndexEntry.object_id`
    pub fn object_id(&self) -> String {
        self.to_string()
    }

    /// Kind of this key
    pub fn kind(&self) -> PkKind {
        match self {
            PrimaryKey::Int(_) => PkKind::Int,
            PrimaryKey::Text(_) => PkKind::Text,
        }
    }

    /// Cast a stored object id back into a key of the given kind
    ///
    /// # Errors
    ///
    /// Returns a store error if `object_id` is not a valid integer for an
    /// integer-keyed model.
    pub fn parse(kind: PkKind, object_id: &str) -> Result<Self> {
        match kind {
            PkKind::Int => object_id.parse::<i64>().map(PrimaryKey::Int).map_err(|e| {
                Error::store(format!(
                    "invalid input syntax for integer key {:?}: {}",
                    object_id, e
                ))
            }),
            PkKind::Text => Ok(PrimaryKey::Text(object_id.to_string())),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Int(v) => write!(f, "{}", v),
            PrimaryKey::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(v: i64) -> Self {
        PrimaryKey::Int(v)
    }
}

impl From<&str> for PrimaryKey {
    fn from(v: &str) -> Self {
        PrimaryKey::Text(v.to_string())
    }
}

impl From<String> for PrimaryKey {
    fn from(v: String) -> Self {
        PrimaryKey::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_display() {
        let ct = ContentType::new("blog.BlogPage");
        assert_eq!(ct.to_string(), "blog.BlogPage");
        assert_eq!(ct.label(), "blog.BlogPage");
        assert_eq!(ContentType::from("blog.BlogPage"), ct);
    }

    #[test]
    fn test_object_id_is_text() {
        assert_eq!(PrimaryKey::Int(42).object_id(), "42");
        assert_eq!(PrimaryKey::from("home-page").object_id(), "home-page");
    }

    #[test]
    fn test_parse_round_trips_kind() {
        assert_eq!(PrimaryKey::parse(PkKind::Int, "7").unwrap(), PrimaryKey::Int(7));
        assert_eq!(
            PrimaryKey::parse(PkKind::Text, "7").unwrap(),
            PrimaryKey::Text("7".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_integer_is_store_error() {
        let err = PrimaryKey::parse(PkKind::Int, "abc").unwrap_err();
        assert!(err.is_store());
    }

    #[test]
    fn test_integer_keys_sort_numerically() {
        let mut keys = vec![PrimaryKey::Int(10), PrimaryKey::Int(2), PrimaryKey::Int(1)];
        keys.sort();
        assert_eq!(
            keys,
            vec![PrimaryKey::Int(1), PrimaryKey::Int(2), PrimaryKey::Int(10)]
        );
    }
}
