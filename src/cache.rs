//! Time-based memoizing cache shared by the Wikidata and Wikipedia clients.
//!
//! Entries are keyed on the calling function's name plus its arguments and
//! hold the serialized result with its insertion time. Expiry is checked on
//! read; there is no background eviction.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::lookup::Lookup;
use crate::TARGET_CACHE;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    function: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(function: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            function,
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything, so every call goes to the network.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    /// Expired entries are dropped on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let value = {
            let entry = self.entries.get(key)?;
            if entry.inserted_at.elapsed() >= self.ttl {
                None
            } else {
                Some(entry.value.clone())
            }
        };

        let Some(value) = value else {
            debug!(target: TARGET_CACHE, "Cache entry expired for {}({:?})", key.function, key.args);
            self.entries.remove(key);
            return None;
        };

        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(target: TARGET_CACHE, "Dropping undecodable cache entry for {}: {}", key.function, err);
                self.entries.remove(key);
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: CacheKey, value: &T) {
        if !self.enabled {
            return;
        }

        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    CacheEntry {
                        value,
                        inserted_at: Instant::now(),
                    },
                );
            }
            Err(err) => {
                warn!(target: TARGET_CACHE, "Failed to serialize value for {}: {}", key.function, err);
            }
        }
    }

    /// Read-through, write-through wrapper around a lookup.
    ///
    /// `Unavailable` outcomes are returned but never stored.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Lookup<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Lookup<T>>,
    {
        if let Some(cached) = self.get::<Lookup<T>>(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(target: TARGET_CACHE, "Cache hit for {}({:?})", key.function, key.args);
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(target: TARGET_CACHE, "Cache miss for {}({:?})", key.function, key.args);

        let result = fetch().await;
        if result.is_cacheable() {
            self.insert(key, &result);
        }
        result
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }
}
