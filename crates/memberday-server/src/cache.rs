//! Cache-aside store for scraped datasets.
//!
//! Each key owns its own async mutex, held for the whole
//! check-fetch-store sequence: concurrent readers of one key share a single
//! upstream fetch, while different keys never wait on each other.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

/// How long a scraped dataset is served before the next read refreshes it.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Data and its timestamp are only ever written together.
struct Stored<T> {
    data: Arc<T>,
    last_updated: DateTime<Utc>,
}

struct CacheEntry<T> {
    stored: Option<Stored<T>>,
}

pub struct TtlCache<T> {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Arc<Mutex<CacheEntry<T>>>>>,
}

impl<T> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache with the service's fixed TTL and the system clock.
    #[must_use]
    pub fn with_default_ttl() -> Self {
        Self::new(TimeDelta::hours(CACHE_TTL_HOURS), Arc::new(SystemClock))
    }

    async fn entry(&self, key: &str) -> Arc<Mutex<CacheEntry<T>>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(
            entries
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(CacheEntry { stored: None }))),
        )
    }

    /// Returns the cached value for `key` while it is younger than the TTL,
    /// otherwise awaits `producer` and stores its result.
    ///
    /// A failed refresh leaves any previous value in place and hands the
    /// error back to the caller.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `producer`.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, producer: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let entry = self.entry(key).await;
        let mut guard = entry.lock().await;

        if let Some(stored) = &guard.stored {
            if self.clock.now() - stored.last_updated < self.ttl {
                tracing::debug!(key, last_updated = %stored.last_updated, "cache hit");
                return Ok(Arc::clone(&stored.data));
            }
        }

        tracing::info!(key, "cache stale or empty, refreshing");
        match producer().await {
            Ok(value) => {
                let data = Arc::new(value);
                guard.stored = Some(Stored {
                    data: Arc::clone(&data),
                    last_updated: self.clock.now(),
                });
                Ok(data)
            }
            Err(error) => {
                tracing::warn!(key, error = %error, "cache refresh failed; previous entry kept");
                Err(error)
            }
        }
    }

    #[cfg(test)]
    async fn snapshot(&self, key: &str) -> Option<(Arc<T>, DateTime<Utc>)> {
        let entry = self.entries.lock().await.get(key).cloned()?;
        let guard = entry.lock().await;
        guard
            .stored
            .as_ref()
            .map(|stored| (Arc::clone(&stored.data), stored.last_updated))
    }
}
