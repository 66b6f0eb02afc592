// src/config.rs

//! Parser settings loaded from TOML.

use crate::constants::{DEFAULT_CACHE_QUERIES_WITH_ARGUMENTS, DEFAULT_CACHE_SIZE_LIMIT};
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunable settings of a [`crate::ScpiParser`].
///
/// Loaded from TOML, e.g.
///
/// ```toml
/// cache_size_limit = 50
/// cache_queries_with_arguments = true
/// ```
///
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Number of distinct queries to cache. 0 disables the cache; negative
    /// values are treated as 0.
    pub cache_size_limit: i64,
    /// Whether queries containing argument values are cached.
    pub cache_queries_with_arguments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache_size_limit: i64::try_from(DEFAULT_CACHE_SIZE_LIMIT).unwrap_or(i64::MAX),
            cache_queries_with_arguments: DEFAULT_CACHE_QUERIES_WITH_ARGUMENTS,
        }
    }
}

impl ParserConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a parse error if its
    /// content is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading parser configuration from '{}'", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The cache size limit with negative values clamped to 0.
    pub fn effective_cache_size_limit(&self) -> usize {
        usize::try_from(self.cache_size_limit).unwrap_or(0)
    }
}
