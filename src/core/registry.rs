// src/core/registry.rs

//! Handler and abbreviation lookup.

use crate::core::commons::{read_lock, write_lock};
use crate::core::path::ScpiPath;
use crate::models::Handler;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::RwLock;

lazy_static! {
    // The short form of a segment is its first run of uppercase letters and SCPI symbols.
    static ref ABBREVIATION_RE: Regex = Regex::new(r"[A-Z_*?]+").expect("abbreviation pattern is valid");
}

/// Maps command paths to handlers and abbreviations to full segment names.
///
/// The abbreviation table is shared by every path in the registry: if two
/// segments produce the same short form, the one registered last wins.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<ScpiPath, Handler>>,
    abbreviations: RwLock<HashMap<String, String>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `path`, replacing any previous handler for it.
    pub fn register(&self, path: ScpiPath, handler: Handler) {
        {
            let mut abbreviations = write_lock(&self.abbreviations);
            for segment in path.segments() {
                if let Some(short) = abbreviation_of(segment) {
                    let previous = abbreviations.insert(short.to_string(), segment.to_string());
                    if let Some(previous) = previous.filter(|p| p != segment) {
                        debug!(
                            "Abbreviation '{}' now expands to '{}' (was '{}')",
                            short, segment, previous
                        );
                    }
                }
            }
        }
        debug!("Registering handler for '{}'", path);
        write_lock(&self.handlers).insert(path, handler);
    }

    /// Looks up the handler registered under exactly `path`.
    pub fn resolve(&self, path: &ScpiPath) -> Option<Handler> {
        read_lock(&self.handlers).get(path).cloned()
    }

    /// Expands an abbreviation to the full segment it was derived from.
    pub fn canonical_segment(&self, word: &str) -> Option<String> {
        read_lock(&self.abbreviations).get(word).cloned()
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        read_lock(&self.handlers).len()
    }

    /// Whether no handler has been registered.
    pub fn is_empty(&self) -> bool {
        read_lock(&self.handlers).is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<String> = read_lock(&self.handlers)
            .keys()
            .map(ToString::to_string)
            .collect();
        paths.sort();
        f.debug_struct("HandlerRegistry")
            .field("paths", &paths)
            .field("abbreviations", &*read_lock(&self.abbreviations))
            .finish()
    }
}

/// Extracts the abbreviation of a segment, e.g. `MEAS` from `MEASure`.
pub fn abbreviation_of(segment: &str) -> Option<&str> {
    ABBREVIATION_RE.find(segment).map(|m| m.as_str())
}
