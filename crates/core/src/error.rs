//! Error types for ftindex
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Errors fall into three classes:
//! - configuration errors: fatal, raised at setup or planning time, never retried
//! - extraction errors: a single object could not be turned into searchable text
//! - store errors: raised by the underlying store, propagated unchanged

use crate::types::ContentType;
use std::io;
use thiserror::Error;

/// Result type alias for ftindex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ftindex
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A record type that was never registered in the schema
    #[error("Unknown model: {0}")]
    UnknownModel(ContentType),

    /// A field named in `fields` is not a declared search field
    #[error("Cannot search with field \"{field}\": it is not a search field of {model}")]
    SearchField {
        /// Offending field name
        field: String,
        /// Model the search was scoped to
        model: ContentType,
    },

    /// A structural filter references a field that is not declared filterable
    #[error("Cannot filter search results with field \"{field}\": it is not a filter field of {model}")]
    FilterField {
        /// Offending field name
        field: String,
        /// Model the search was scoped to
        model: ContentType,
    },

    /// A combinator was asked to reduce zero queries
    #[error("Cannot combine an empty list of text queries")]
    EmptyCombination,

    /// Operator other than AND/OR
    #[error("Unsupported search operator: {0:?}")]
    UnsupportedOperator(String),

    /// A record has no value or accessor for the requested field
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Extracting searchable text from one object failed
    #[error("Cannot index {content_type} object {object_id}: {reason}")]
    Extraction {
        /// Concrete type of the object
        content_type: ContentType,
        /// Object primary key as text
        object_id: String,
        /// Underlying failure
        reason: String,
    },

    /// Unique constraint `(config, content_type, object_id)` violated
    #[error("Duplicate index entry ({config}, {content_type}, {object_id})")]
    UniqueViolation {
        /// Linguistic configuration
        config: String,
        /// Content type of the entry
        content_type: ContentType,
        /// Object id of the entry
        object_id: String,
    },

    /// Transaction could not be started, committed or rolled back
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Any other store failure
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Create a transaction error
    pub fn transaction(msg: impl Into<String>) -> Self {
        Error::Transaction(msg.into())
    }

    /// True for errors that surface at setup time and must never be retried
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_)
                | Error::UnknownModel(_)
                | Error::SearchField { .. }
                | Error::FilterField { .. }
                | Error::EmptyCombination
                | Error::UnsupportedOperator(_)
                | Error::ConfigParse(_)
        )
    }

    /// True for failures raised by the underlying store
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Error::Store(_) | Error::UniqueViolation { .. } | Error::Transaction(_)
        )
    }
}
