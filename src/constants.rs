// src/constants.rs

//! Default settings and separator characters.

/// Number of distinct queries a parser caches when no limit is configured.
pub const DEFAULT_CACHE_SIZE_LIMIT: usize = 20;

/// Whether queries carrying argument values are cached by default.
pub const DEFAULT_CACHE_QUERIES_WITH_ARGUMENTS: bool = false;

/// Separator between the segments of a command path.
pub const PATH_SEPARATOR: char = ':';

/// Separator between chained commands in a single query.
pub const COMMAND_SEPARATOR: char = ';';
