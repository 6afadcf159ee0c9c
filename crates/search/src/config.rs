//! Backend configuration via `ftindex.toml`
//!
//! Every setting has a default, so an empty file is a valid configuration.
//! The linguistic configuration name is checked against the engine when
//! the backend is built.

use ftindex_core::{Error, Result};
use ftindex_engine::TextEngine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "ftindex.toml";

/// Linguistic configuration used when none is set
pub const DEFAULT_SEARCH_CONFIG: &str = "simple";

/// How index entries are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Upsert when the store supports it, update-then-create otherwise
    #[default]
    Auto,
    /// Always upsert; the store must support it
    Upsert,
    /// Always update existing entries, then insert the rest
    UpdateThenCreate,
}

/// Backend configuration loaded from `ftindex.toml`.
///
/// # Example
///
/// ```toml
/// search_config = "english"
/// atomic_rebuild = true
/// write_strategy = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Linguistic configuration for indexing and query parsing
    #[serde(default = "default_search_config")]
    pub search_config: String,
    /// Run rebuilds inside one store transaction
    #[serde(default)]
    pub atomic_rebuild: bool,
    /// Write strategy selection
    #[serde(default)]
    pub write_strategy: WriteMode,
}

fn default_search_config() -> String {
    DEFAULT_SEARCH_CONFIG.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            search_config: default_search_config(),
            atomic_rebuild: false,
            write_strategy: WriteMode::Auto,
        }
    }
}

impl BackendConfig {
    /// Check the linguistic configuration against `engine`
    ///
    /// # Errors
    ///
    /// Configuration error if the engine does not know `search_config`.
    pub fn validate(&self, engine: &dyn TextEngine) -> Result<()> {
        if engine.has_config(&self.search_config) {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "unknown search configuration {:?} in {}",
                self.search_config, CONFIG_FILE_NAME
            )))
        }
    }

    /// Commented `ftindex.toml` holding every default
    pub fn default_toml() -> &'static str {
        r#"# ftindex backend configuration
#
# Linguistic configuration used to build index entries and parse queries.
# Built-in: "simple" (default) or "english"
search_config = "simple"

# Run index rebuilds inside a single store transaction (default: false).
# A rebuild then either fully applies or fully rolls back.
atomic_rebuild = false

# How index entries are written: "auto" (default), "upsert" or
# "update_then_create". "auto" uses upsert when the store supports it.
write_strategy = "auto"
"#
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BackendConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        if config.search_config.trim().is_empty() {
            return Err(Error::configuration("search_config must not be empty"));
        }
        Ok(config)
    }

    /// Load `path`
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `ConfigParse` (prefixed with the
    /// path) if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::ConfigParse(msg) => {
                Error::ConfigParse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Create `path` with the commented defaults; an existing file is left alone
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Save these settings to `path`, replacing any existing file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigParse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
