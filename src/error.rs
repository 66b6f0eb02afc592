// src/error.rs

//! Error types of the parser and the configuration loader.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScpiError {
    /// A command in the query resolved to a path with no registered handler.
    /// Nothing from the query is executed when this is returned.
    #[error("No handler registered for '{path}'")]
    MissingHandler {
        /// The unresolved path, segments joined by `:`.
        path: String,
    },
}

/// Represents errors that can occur while loading a parser configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("I/O error while reading configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML content is invalid and could not be parsed.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        /// The path to the file that failed to parse.
        path: PathBuf,
        /// The underlying parsing error from the `toml` crate.
        #[source]
        source: toml::de::Error,
    },
}
