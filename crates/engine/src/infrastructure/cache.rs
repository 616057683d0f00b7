//! TTL-based cache for entity records.
//!
//! Provides a concurrent cache whose entries go stale after a fixed TTL but
//! stay readable through [`TtlCache::get_stale`] until evicted, so callers can
//! fall back to outdated data when the world API is unreachable.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Key/value store consumed by the data-access executor.
///
/// Implementations must be safe for concurrent use and must not block: every
/// operation is an in-memory map access.
pub trait CacheBackend<K, V>: Send + Sync {
    /// Fresh entries only.
    fn get(&self, key: &K) -> Option<V>;
    /// Any entry, regardless of age.
    fn get_stale(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    /// Store a batch, e.g. one page of search results.
    fn put_all(&self, entries: Vec<(K, V)>) {
        for (key, value) in entries {
            self.put(key, value);
        }
    }
    fn invalidate(&self, key: &K);
    fn clear(&self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of inspecting an entry without touching metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<V> {
    Fresh(V),
    Expired(V),
    Absent,
}

/// A thread-safe cache with time-to-live expiration.
///
/// Expired entries are not removed until `cleanup_expired()`, `invalidate()`
/// or `clear()` is called.
pub struct TtlCache<K, V> {
    entries: DashMap<K, TtlEntry<V>>,
    ttl: Duration,
    metrics: CacheMetrics,
}

struct TtlEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> TtlEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Create a new cache with the specified TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert a value, replacing any existing entry and resetting the TTL.
    pub fn insert(&self, key: K, value: V) {
        let entry = TtlEntry {
            value,
            inserted_at: Instant::now(),
        };
        self.entries.insert(key, entry);
        self.metrics.record_put();
    }

    /// Insert a batch under a single timestamp.
    pub fn insert_all(&self, values: impl IntoIterator<Item = (K, V)>) {
        let now = Instant::now();
        let mut count = 0;
        for (key, value) in values {
            self.entries.insert(
                key,
                TtlEntry {
                    value,
                    inserted_at: now,
                },
            );
            count += 1;
        }
        self.metrics.record_batch_put(count);
    }

    /// Insert a value with an explicit timestamp (tests only).
    #[cfg(test)]
    pub(crate) fn insert_at(&self, key: K, value: V, inserted_at: Instant) {
        let entry = TtlEntry { value, inserted_at };
        self.entries.insert(key, entry);
    }

    /// Get a value if it exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.lookup(key) {
            CacheLookup::Fresh(value) => {
                self.metrics.record_hit();
                Some(value)
            }
            CacheLookup::Expired(_) => {
                self.metrics.record_stale_hit();
                None
            }
            CacheLookup::Absent => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Get a value whether or not it has expired.
    pub fn get_stale(&self, key: &K) -> Option<V> {
        let value = self.entries.get(key).map(|entry| entry.value.clone());
        match value {
            Some(value) => {
                self.metrics.record_stale_hit();
                Some(value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Inspect an entry's freshness without recording metrics.
    pub fn lookup(&self, key: &K) -> CacheLookup<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => CacheLookup::Fresh(entry.value.clone()),
            Some(entry) => CacheLookup::Expired(entry.value.clone()),
            None => CacheLookup::Absent,
        }
    }

    /// Remove and return a value if it exists (regardless of expiration).
    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key).map(|(_, e)| e.value);
        if removed.is_some() {
            self.metrics.record_eviction();
        }
        removed
    }

    /// Remove all expired entries and return the count of removed entries.
    pub fn cleanup_expired(&self) -> usize {
        let before_count = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(self.ttl));
        let removed = before_count.saturating_sub(self.entries.len());
        self.metrics.record_evictions(removed as u64);
        removed
    }

    pub fn clear(&self) {
        let size = self.entries.len();
        self.entries.clear();
        self.metrics.record_evictions(size as u64);
    }

    /// Get the current number of entries (including expired ones not yet cleaned).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

impl<K, V> CacheBackend<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        TtlCache::get(self, key)
    }

    fn get_stale(&self, key: &K) -> Option<V> {
        TtlCache::get_stale(self, key)
    }

    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn put_all(&self, entries: Vec<(K, V)>) {
        self.insert_all(entries);
    }

    fn invalidate(&self, key: &K) {
        self.remove(key);
    }

    fn clear(&self) {
        TtlCache::clear(self);
    }

    fn len(&self) -> usize {
        TtlCache::len(self)
    }
}

/// Lock-free counters describing cache effectiveness.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_hits: AtomicU64,
    puts: AtomicU64,
    evictions: AtomicU64,
}

impl CacheMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_hit(&self) {
        self.stale_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_put(&self, count: u64) {
        self.puts.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub stale_hits: u64,
    pub puts: u64,
    pub evictions: u64,
}

impl CacheMetricsSnapshot {
    /// Whole-percent hit rate over hits and misses; 0 when idle.
    pub fn hit_rate(&self) -> u64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0
        } else {
            self.hits * 100 / total
        }
    }
}

impl std::fmt::Display for CacheMetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hits={}, misses={}, stale={}, puts={}, evictions={}, hitRate={}%",
            self.hits,
            self.misses,
            self.stale_hits,
            self.puts,
            self.evictions,
            self.hit_rate()
        )
    }
}
