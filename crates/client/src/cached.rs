//! Read-through caching for remote reads.
//!
//! [`CachedFetcher`] decorates an arbitrary async fetch with
//! cache-first semantics: hits return the cached snapshot without invoking
//! the fetch; misses invoke it and store the result under the key for the
//! given TTL. Failures propagate unchanged and are never cached, so the next
//! invocation retries fresh.
//!
//! No single-flight deduplication: two concurrent misses on one key may both
//! invoke the fetch; the last writer to the cache wins.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

use studia_core::MemoryCache;
use studia_core::cache::{TTL_MEDIUM, TTL_SHORT, resource_key};

use crate::api::{ApiClient, ApiError, Lesson, Subject, UserStatus};

/// Read-through cache decorator over async fetch operations.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    cache: MemoryCache,
}

impl CachedFetcher {
    pub fn new(cache: MemoryCache) -> Self {
        Self { cache }
    }

    /// The underlying cache, for explicit invalidation or diagnostics.
    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }

    /// Return the cached value for `key`, or invoke `fetch` and cache its
    /// result for `ttl`.
    ///
    /// A cached snapshot that no longer deserializes as `T` is treated as a
    /// miss and overwritten by the fresh result.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(snapshot) = self.cache.get(key) {
            match serde_json::from_value(snapshot) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!(key, error = %e, "cached snapshot no longer deserializes, refetching");
                    self.cache.delete(key);
                }
            }
        }

        let fresh = fetch().await?;

        match serde_json::to_value(&fresh) {
            Ok(snapshot) => self.cache.set_with_ttl(key, snapshot, ttl),
            Err(e) => tracing::warn!(key, error = %e, "result not serializable, skipping cache"),
        }

        Ok(fresh)
    }
}

/// Cached reads over the slow-changing backend resources.
///
/// Subject and lesson reads use the medium TTL tier; per-user status is more
/// volatile and uses the short tier. Job status reads never go through here,
/// the poller needs them fresh.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    api: ApiClient,
    fetcher: CachedFetcher,
}

impl CatalogClient {
    pub fn new(api: ApiClient, cache: MemoryCache) -> Self {
        Self { api, fetcher: CachedFetcher::new(cache) }
    }

    /// List all subjects, cached.
    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let key = resource_key("subjects", &[]);
        self.fetcher.get_or_fetch(&key, TTL_MEDIUM, || self.api.list_subjects()).await
    }

    /// List a subject's lessons, cached.
    pub async fn lessons(&self, subject_id: &str) -> Result<Vec<Lesson>, ApiError> {
        let key = resource_key("lessons", &[subject_id]);
        self.fetcher.get_or_fetch(&key, TTL_MEDIUM, || self.api.subject_lessons(subject_id)).await
    }

    /// Read a user's progress summary, cached briefly.
    pub async fn user_status(&self, user_id: &str) -> Result<UserStatus, ApiError> {
        let key = resource_key("user_status", &[user_id]);
        self.fetcher.get_or_fetch(&key, TTL_SHORT, || self.api.user_status(user_id)).await
    }

    /// Drop the cached lesson list for a subject.
    ///
    /// Called after a generation job completes so the next read sees the new
    /// lessons instead of a stale snapshot.
    pub fn invalidate_lessons(&self, subject_id: &str) {
        self.fetcher.cache().delete(&resource_key("lessons", &[subject_id]));
    }

    /// The underlying API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fetcher() -> CachedFetcher {
        CachedFetcher::new(MemoryCache::new(Duration::from_secs(300)))
    }

    #[tokio::test]
    async fn test_miss_then_hit_invokes_fetch_once() {
        let fetcher = fetcher();
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            let value: Vec<String> = fetcher
                .get_or_fetch("k", Duration::from_secs(60), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["algebra".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["algebra".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let fetcher = fetcher();
        let calls = Arc::new(AtomicU32::new(0));

        let failing = {
            let calls = calls.clone();
            fetcher.get_or_fetch::<Vec<String>, _, _>("k", Duration::from_secs(60), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Server { status: 500, message: "boom".into(), details: None })
            })
        };
        assert!(failing.await.is_err());

        // Next call re-invokes the fetch rather than serving a cached failure.
        let calls2 = calls.clone();
        let value: Vec<String> = fetcher
            .get_or_fetch("k", Duration::from_secs(60), || async move {
                calls2.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["fresh".to_string()])
            })
            .await
            .unwrap();

        assert_eq!(value, vec!["fresh".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates_unchanged() {
        let fetcher = fetcher();
        let err = fetcher
            .get_or_fetch::<(), _, _>("k", Duration::from_secs(60), || async {
                Err(ApiError::Timeout("request timed out".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_undeserializable_snapshot_refetched() {
        let fetcher = fetcher();
        // Seed the key with a shape that is not a Vec<String>.
        fetcher.cache().set("k", json!({ "unexpected": true }));

        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = calls.clone();
        let value: Vec<String> = fetcher
            .get_or_fetch("k", Duration::from_secs(60), || async move {
                calls2.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["replaced".to_string()])
            })
            .await
            .unwrap();

        assert_eq!(value, vec!["replaced".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The bad snapshot was overwritten.
        assert_eq!(fetcher.cache().get("k"), Some(json!(["replaced"])));
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let fetcher = fetcher();
        let calls = Arc::new(AtomicU32::new(0));

        for key in ["a", "b"] {
            let calls = calls.clone();
            let _: u32 = fetcher
                .get_or_fetch(key, Duration::from_secs(60), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
