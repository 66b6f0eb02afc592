//! # SCPI Parser
//!
//! The public entry point: handlers are registered once with
//! [`ScpiParser::register`], then raw queries are submitted with
//! [`ScpiParser::accept`].
//!
//! ```
//! use scpi::ScpiParser;
//!
//! let parser = ScpiParser::new();
//! parser.register("*IDN?", |_: &[String]| Some("Simple SCPI Parser".to_string()));
//! parser.register("MEASure:VOLTage:DC?", |_: &[String]| Some("2.23".to_string()));
//! parser.register("MEASure:VOLTage:AC?", |_: &[String]| Some("0.123".to_string()));
//!
//! let results = parser.accept("*IDN?;MEAS:VOLT:DC?;AC?").unwrap();
//! assert_eq!(
//!     results,
//!     [
//!         Some("Simple SCPI Parser".to_string()),
//!         Some("2.23".to_string()),
//!         Some("0.123".to_string()),
//!     ]
//! );
//! ```
//!
//! Parsed queries are cached (20 distinct queries by default) so repeated queries
//! skip tokenizing and parsing. Handlers still run on every call. Queries that
//! carry argument values are not cached unless
//! [`ScpiParser::set_cache_queries_with_arguments`] enables it.

use crate::config::ParserConfig;
use crate::core::{cache::QueryCache, command_parser, lexer, path::ScpiPath, registry::HandlerRegistry};
use crate::error::ScpiError;
use crate::models::{CommandHandler, Invocation};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// A SCPI command parser and dispatcher.
///
/// `ScpiParser` is `Send + Sync`; handlers can be registered and queries accepted
/// concurrently from any number of threads. Cache settings belong to the
/// instance, so parsers in the same process do not affect each other.
#[derive(Debug, Default)]
pub struct ScpiParser {
    registry: HandlerRegistry,
    cache: QueryCache,
}

impl ScpiParser {
    /// Creates a parser with the default cache settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given settings.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            cache: QueryCache::new(
                config.effective_cache_size_limit(),
                config.cache_queries_with_arguments,
            ),
        }
    }

    /// Registers `handler` for the full, unabbreviated command `path`, e.g.
    /// `"MEASure:VOLTage:DC?"`.
    ///
    /// The uppercase part of each segment becomes an accepted abbreviation
    /// (`MEAS`, `VOLT`, `DC?`). Registering the same path again replaces its
    /// handler. Cached queries are discarded.
    pub fn register<H>(&self, path: &str, handler: H)
    where
        H: CommandHandler + 'static,
    {
        self.registry.register(ScpiPath::parse(path), Arc::new(handler));
        self.cache.invalidate();
    }

    /// Parses and executes `query`, returning one result per command in order.
    ///
    /// A result is `None` when the handler returned nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ScpiError::MissingHandler`] if any command in the query has no
    /// registered handler. No handler of the query runs in that case.
    pub fn accept(&self, query: &str) -> Result<Vec<Option<String>>, ScpiError> {
        let invocations = self.parse(query)?;
        Ok(invocations.iter().map(Invocation::execute).collect())
    }

    /// Resolves `query` to invocations, from the cache when possible.
    fn parse(&self, query: &str) -> Result<Arc<[Invocation]>, ScpiError> {
        if let Some(cached) = self.cache.lookup(query) {
            return Ok(cached);
        }

        let generation = self.cache.generation();
        let tokens = lexer::tokenize(query);
        let invocations: Arc<[Invocation]> = command_parser::parse(&tokens, &self.registry)
            .inspect_err(|e| debug!("Rejected query '{}': {}", query, e))?
            .into();
        self.cache.insert(
            query,
            Arc::clone(&invocations),
            lexer::contains_argument(&tokens),
            generation,
        );
        Ok(invocations)
    }

    /// Sets the number of distinct queries to cache. Negative values are treated
    /// as 0, which disables caching.
    pub fn set_cache_size_limit(&self, limit: i64) {
        self.cache
            .set_size_limit(usize::try_from(limit).unwrap_or(0));
    }

    /// The number of distinct queries this parser caches.
    pub fn cache_size_limit(&self) -> usize {
        self.cache.size_limit()
    }

    /// Enables or disables caching of queries that contain argument values.
    ///
    /// Caching these helps only when the same argument values repeat often.
    pub fn set_cache_queries_with_arguments(&self, enabled: bool) {
        self.cache.set_cache_queries_with_arguments(enabled);
    }

    /// Whether queries containing argument values are cached.
    pub fn cache_queries_with_arguments(&self) -> bool {
        self.cache.cache_queries_with_arguments()
    }

    /// Number of queries currently cached.
    pub fn cached_query_count(&self) -> usize {
        self.cache.len()
    }

    /// A snapshot of the cached queries and how often each was requested.
    pub fn cache_frequencies(&self) -> HashMap<String, u64> {
        self.cache.frequencies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn constant(value: &'static str) -> impl Fn(&[String]) -> Option<String> + Send + Sync {
        move |_: &[String]| Some(value.to_string())
    }

    #[test]
    fn test_handler_runs_on_every_call_even_when_cached() {
        let parser = ScpiParser::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        parser.register("*TRG", move |_: &[String]| -> Option<String> {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        for _ in 0..5 {
            assert_eq!(parser.accept("*TRG").unwrap(), [None]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(parser.cache_frequencies().get("*TRG"), Some(&5));
    }

    #[test]
    fn test_chained_shorthand() {
        let parser = ScpiParser::new();
        parser.register("MEAS:VOLT:DC?", constant("2.23"));
        parser.register("MEAS:VOLT:AC?", constant("0.123"));

        let results = parser.accept("MEAS:VOLT:DC?;AC?").unwrap();
        assert_eq!(results, [Some("2.23".to_string()), Some("0.123".to_string())]);
    }

    #[test]
    fn test_leading_colon_resets_path() {
        let parser = ScpiParser::new();
        parser.register("MEASure:VOLTage:DC?", constant("2.23"));
        parser.register("MEASure:CURRent:AC?", constant("0.123"));

        let results = parser
            .accept("MEAS:VOLT:DC?;:MEASure:CURRent:AC?")
            .unwrap();
        assert_eq!(results, [Some("2.23".to_string()), Some("0.123".to_string())]);
    }

    #[test]
    fn test_missing_handler() {
        let parser = ScpiParser::new();
        parser.register("MEAS:VOLT:DC?", constant("2.23"));

        let err = parser.accept("MEAS:VOLTs:DC?").unwrap_err();
        assert_eq!(
            err,
            ScpiError::MissingHandler {
                path: "MEAS:VOLTs:DC?".to_string()
            }
        );
        assert_eq!(err.to_string(), "No handler registered for 'MEAS:VOLTs:DC?'");
        assert_eq!(parser.cached_query_count(), 0);
    }

    #[test]
    fn test_missing_handler_runs_nothing() {
        let parser = ScpiParser::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        parser.register("*TRG", move |_: &[String]| -> Option<String> {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        assert!(parser.accept("*TRG;*BOGUS").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_argument_capture() {
        let parser = ScpiParser::new();
        parser.register("CONCAT", |args: &[String]| Some(args.join(" ")));

        let results = parser
            .accept("CONCAT These strings should be \"concatenated.\"")
            .unwrap();
        assert_eq!(results, [Some("These strings should be concatenated.".to_string())]);
    }

    #[test]
    fn test_cache_reflects_handler_state() {
        let parser = ScpiParser::new();
        parser.set_cache_size_limit(20);
        parser.set_cache_queries_with_arguments(false);

        let x = Arc::new(Mutex::new(0_i64));
        let setter = Arc::clone(&x);
        parser.register("VAR:X", move |args: &[String]| -> Option<String> {
            if let Some(value) = args.first().and_then(|a| a.parse().ok()) {
                *setter.lock().unwrap() = value;
            }
            None
        });
        let getter = Arc::clone(&x);
        parser.register("VAR:X?", move |_: &[String]| {
            Some(getter.lock().unwrap().to_string())
        });

        for i in 0..100 {
            parser.accept(&format!("VAR:X {}", i)).unwrap();
            let results = parser.accept("VAR:X?").unwrap();
            assert_eq!(results, [Some(i.to_string())]);
        }

        let frequencies = parser.cache_frequencies();
        assert_eq!(frequencies.len(), 1);
        assert_eq!(frequencies.get("VAR:X?"), Some(&100));
    }

    #[test]
    fn test_queries_with_arguments_cached_when_enabled() {
        let parser = ScpiParser::new();
        parser.register("VAR:X", |_: &[String]| -> Option<String> { None });
        parser.set_cache_queries_with_arguments(true);
        assert!(parser.cache_queries_with_arguments());

        parser.accept("VAR:X 1").unwrap();
        parser.accept("VAR:X 1").unwrap();
        assert_eq!(parser.cache_frequencies().get("VAR:X 1"), Some(&2));
    }

    #[test]
    fn test_cache_bound() {
        let parser = ScpiParser::new();
        parser.set_cache_size_limit(3);
        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        for name in names {
            parser.register(&format!("CH{}?", name), constant("1"));
        }
        for name in names {
            parser.accept(&format!("CH{}?", name)).unwrap();
            assert!(parser.cached_query_count() <= 3);
        }
        assert_eq!(parser.cached_query_count(), 3);
    }

    #[test]
    fn test_cache_size_limit_clamps_and_disables() {
        let parser = ScpiParser::new();
        assert_eq!(parser.cache_size_limit(), 20);
        parser.register("*IDN?", constant("id"));

        parser.set_cache_size_limit(-5);
        assert_eq!(parser.cache_size_limit(), 0);
        parser.accept("*IDN?").unwrap();
        parser.accept("*IDN?").unwrap();
        assert_eq!(parser.cached_query_count(), 0);
    }

    #[test]
    fn test_registration_invalidates_cache() {
        let parser = ScpiParser::new();
        parser.register("SOURce:LEVel?", constant("old"));
        assert_eq!(parser.accept("SOUR:LEVel?").unwrap(), [Some("old".to_string())]);
        assert_eq!(parser.cached_query_count(), 1);

        parser.register("SOURce:LEVel?", constant("new"));
        assert_eq!(parser.cached_query_count(), 0);
        assert_eq!(parser.accept("SOUR:LEVel?").unwrap(), [Some("new".to_string())]);
    }

    #[test]
    fn test_with_config() {
        let parser = ScpiParser::with_config(ParserConfig {
            cache_size_limit: 2,
            cache_queries_with_arguments: true,
        });
        assert_eq!(parser.cache_size_limit(), 2);
        assert!(parser.cache_queries_with_arguments());
    }

    #[test]
    fn test_instances_have_independent_cache_settings() {
        let first = ScpiParser::new();
        let second = ScpiParser::new();
        first.set_cache_size_limit(0);
        first.set_cache_queries_with_arguments(true);

        assert_eq!(second.cache_size_limit(), 20);
        assert!(!second.cache_queries_with_arguments());
    }

    #[test]
    fn test_concurrent_accept_and_register() {
        use rayon::prelude::*;

        let parser = ScpiParser::new();
        parser.set_cache_size_limit(4);
        parser.register("MEASure:VOLTage:DC?", constant("2.23"));
        parser.register("MEASure:CURRent:AC?", constant("0.123"));

        (0..2000).into_par_iter().for_each(|i| {
            if i % 100 == 0 {
                parser.register("SYSTem:VERSion?", constant("1999.0"));
            }
            let results = parser.accept("MEAS:VOLT:DC?;:MEAS:CURR:AC?").unwrap();
            assert_eq!(results, [Some("2.23".to_string()), Some("0.123".to_string())]);
            assert!(parser.cached_query_count() <= 4);
        });

        assert_eq!(parser.accept("SYST:VERSion?").unwrap(), [Some("1999.0".to_string())]);
    }
}
