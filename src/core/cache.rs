// src/core/cache.rs

//! Frequency-ranked cache of parsed queries.

use crate::constants::{DEFAULT_CACHE_QUERIES_WITH_ARGUMENTS, DEFAULT_CACHE_SIZE_LIMIT};
use crate::core::commons::lock;
use crate::models::Invocation;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A parsed query kept for reuse, with the number of times it was requested.
#[derive(Debug)]
struct CacheEntry {
    invocations: Arc<[Invocation]>,
    frequency: u64,
}

/// A bounded cache of parsed queries, keyed by the exact query text.
///
/// When full, the entry requested the fewest times is evicted. Frequencies start
/// at 1 on insertion, grow by one on every hit and never decay, so this is a
/// least-frequently-used policy rather than least-recently-used.
///
/// Only parsing is cached. The invocations returned by [`QueryCache::lookup`] are
/// still executed by the caller on every request.
#[derive(Debug)]
pub struct QueryCache {
    size_limit: AtomicUsize,
    cache_queries_with_arguments: AtomicBool,
    // Bumped by `invalidate`; inserts carrying an older value are dropped.
    generation: AtomicU64,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE_LIMIT, DEFAULT_CACHE_QUERIES_WITH_ARGUMENTS)
    }
}

impl QueryCache {
    /// Creates an empty cache. A `size_limit` of 0 disables caching.
    pub fn new(size_limit: usize, cache_queries_with_arguments: bool) -> Self {
        Self {
            size_limit: AtomicUsize::new(size_limit),
            cache_queries_with_arguments: AtomicBool::new(cache_queries_with_arguments),
            generation: AtomicU64::new(0),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the parsed form of `query` if cached, counting the hit.
    pub fn lookup(&self, query: &str) -> Option<Arc<[Invocation]>> {
        if self.size_limit() == 0 {
            return None;
        }
        let mut entries = lock(&self.entries);
        let entry = entries.get_mut(query)?;
        entry.frequency += 1;
        debug!("Cache hit for '{}' (frequency {})", query, entry.frequency);
        Some(Arc::clone(&entry.invocations))
    }

    /// Caches the parsed form of `query` if it is eligible.
    ///
    /// `generation` must be the value of [`QueryCache::generation`] read before
    /// the query was parsed. Returns whether the entry was stored.
    pub fn insert(
        &self,
        query: &str,
        invocations: Arc<[Invocation]>,
        contains_argument: bool,
        generation: u64,
    ) -> bool {
        if contains_argument && !self.cache_queries_with_arguments() {
            debug!("Not caching '{}': it carries arguments", query);
            return false;
        }

        // Eviction and insertion happen under one lock so concurrent inserts
        // can neither overshoot the limit nor evict the same victim twice.
        // `set_size_limit` stores under the same lock, so the limit is read here.
        let mut entries = lock(&self.entries);
        let size_limit = self.size_limit();
        if size_limit == 0 {
            return false;
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Not caching '{}': handlers changed while it was parsed", query);
            return false;
        }
        if entries.contains_key(query) {
            return false;
        }
        evict_down_to(&mut entries, size_limit - 1);
        entries.insert(
            query.to_string(),
            CacheEntry {
                invocations,
                frequency: 1,
            },
        );
        debug!("Cached '{}' ({}/{})", query, entries.len(), size_limit);
        true
    }

    /// Drops every entry and makes in-flight inserts stale.
    pub fn invalidate(&self) {
        let mut entries = lock(&self.entries);
        self.generation.fetch_add(1, Ordering::SeqCst);
        if !entries.is_empty() {
            debug!("Invalidating {} cached queries", entries.len());
            entries.clear();
        }
    }

    /// The current generation, to be passed back to [`QueryCache::insert`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Maximum number of cached queries. 0 means caching is disabled.
    pub fn size_limit(&self) -> usize {
        self.size_limit.load(Ordering::SeqCst)
    }

    /// Changes the size limit, evicting the least frequently used entries that no
    /// longer fit.
    pub fn set_size_limit(&self, size_limit: usize) {
        let mut entries = lock(&self.entries);
        self.size_limit.store(size_limit, Ordering::SeqCst);
        evict_down_to(&mut entries, size_limit);
    }

    /// Whether queries containing argument values are cached.
    pub fn cache_queries_with_arguments(&self) -> bool {
        self.cache_queries_with_arguments.load(Ordering::SeqCst)
    }

    /// Enables or disables caching of queries containing argument values.
    pub fn set_cache_queries_with_arguments(&self, enabled: bool) {
        self.cache_queries_with_arguments
            .store(enabled, Ordering::SeqCst);
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// A snapshot of every cached query and its request count.
    pub fn frequencies(&self) -> HashMap<String, u64> {
        lock(&self.entries)
            .iter()
            .map(|(query, entry)| (query.clone(), entry.frequency))
            .collect()
    }
}

/// Evicts lowest-frequency entries until at most `max_len` remain.
/// Ties are broken by map iteration order.
fn evict_down_to(entries: &mut HashMap<String, CacheEntry>, max_len: usize) {
    while entries.len() > max_len {
        let Some(victim) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.frequency)
            .map(|(query, _)| query.clone())
        else {
            break;
        };
        if let Some(evicted) = entries.remove(&victim) {
            debug!(
                "Evicting '{}' from cache (frequency {})",
                victim, evicted.frequency
            );
        }
    }
}
