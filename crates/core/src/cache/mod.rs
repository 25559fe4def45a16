//! In-memory TTL cache for remote read results.
//!
//! This module provides a process-local, key-addressed cache with per-entry
//! expiry. It holds snapshots of prior successful responses so slow-changing
//! reads (subject catalog, lesson lists, user status) do not hammer the
//! backend. The cache is session-scoped: no durability, no cross-process
//! sharing.
//!
//! - Entries are never returned past their expiry; reads lazily evict.
//! - Writes opportunistically sweep all currently-expired entries.
//! - Time is read through an injectable [`Clock`] so tests can advance it
//!   without sleeping.

pub mod clock;
pub mod key;

pub use clock::{Clock, SystemClock};
pub use key::resource_key;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// TTL tier for volatile reads (per-user status).
pub const TTL_SHORT: Duration = Duration::from_secs(60);

/// TTL tier for slow-changing reads (subject catalog, lesson lists).
pub const TTL_MEDIUM: Duration = Duration::from_secs(5 * 60);

/// TTL tier for rarely-changing reads.
pub const TTL_LONG: Duration = Duration::from_secs(30 * 60);

/// TTL tier for effectively static reads.
pub const TTL_VERY_LONG: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached snapshot with expiry bookkeeping.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    /// Wall-clock fetch time, kept for diagnostics only.
    fetched_at: DateTime<Utc>,
}

/// Diagnostic view of the cache contents.
///
/// Never authoritative: a key listed here may expire before the next read.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub keys: Vec<String>,
}

#[derive(Debug)]
struct Inner {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Box<dyn Clock>,
    default_ttl: Duration,
}

/// Key-addressed in-memory store of JSON snapshots with per-entry expiry.
///
/// The handle is cheap to clone; all clones share one entry map. Operations
/// are short and lock-bounded, safe to call from async contexts.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<Inner>,
}

impl MemoryCache {
    /// Create a cache with the given default TTL and the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, SystemClock)
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(default_ttl: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                clock: Box::new(clock),
                default_ttl,
            }),
        }
    }

    /// Store a value under `key` with the default TTL, overwriting any
    /// existing entry.
    pub fn set(&self, key: &str, value: Value) {
        self.set_with_ttl(key, value, self.inner.default_ttl);
    }

    /// Store a value under `key` with an explicit TTL.
    ///
    /// Always succeeds. Also sweeps all entries that have already expired,
    /// so the map does not accumulate dead entries between reads.
    pub fn set_with_ttl(&self, key: &str, value: Value, ttl: Duration) {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.lock().unwrap();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry { value, expires_at: now + ttl, fetched_at: Utc::now() },
        );
        tracing::debug!(key, ttl_secs = ttl.as_secs(), "cache set");
    }

    /// Return the stored value if present and unexpired.
    ///
    /// Reading an expired entry evicts it; an expired value is never
    /// returned.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                tracing::debug!(key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                tracing::debug!(key, "cache entry expired, evicting");
                None
            }
            None => {
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }

    /// Remove the entry for `key` unconditionally. No-op if absent.
    pub fn delete(&self, key: &str) {
        let mut entries = self.inner.entries.lock().unwrap();
        entries.remove(key);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut entries = self.inner.entries.lock().unwrap();
        entries.clear();
    }

    /// Current entry count and live keys, for diagnostics.
    ///
    /// Expired-but-unswept entries are excluded.
    pub fn stats(&self) -> CacheStats {
        let now = self.inner.clock.now();
        let entries = self.inner.entries.lock().unwrap();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        CacheStats { entries: keys.len(), keys }
    }

    /// Wall-clock time the entry for `key` was stored, if live.
    pub fn fetched_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.inner.clock.now();
        let entries = self.inner.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.fetched_at)
    }
}
