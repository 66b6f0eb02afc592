// src/core/path.rs

//! Colon-separated command paths.

use crate::constants::PATH_SEPARATOR;
use std::fmt;

/// An ordered sequence of command segments, e.g. `MEASure:VOLTage:DC?`.
///
/// Equality and hashing are structural over the segment sequence, so a path
/// built while parsing a query finds the handler registered under an equal path.
/// The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScpiPath {
    segments: Vec<String>,
}

impl ScpiPath {
    /// Creates an empty (root) path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registration path such as `"MEASure : VOLTage:DC?"`.
    ///
    /// Whitespace around each segment is trimmed and empty segments are dropped,
    /// so a leading `:` is accepted and ignored.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split(PATH_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Appends a segment to the end of the path.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Removes the last segment. Does nothing on the root path.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Resets the path to the root.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for ScpiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
