//! Time-to-live memoization of fallible fetches.
//!
//! [`RegistryCache`] is an explicit object owned by whoever runs a scaffold
//! (not process-global state). An entry is reusable while
//! `now - timestamp < ttl`; expired entries are refetched on the next `get`
//! rather than evicted eagerly.
//!
//! The lock is released while `fetch` runs, so two concurrent misses on the
//! same key both fetch. Callers that need single-flight semantics must add
//! per-key locking.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use tracing::{debug, trace};

use crate::{application::ApplicationError, error::SeedlingResult};

/// One hour.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000);

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock monotonic time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached value and when it was fetched.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: Arc<T>,
    pub timestamp: Instant,
}

impl<T> CacheEntry<T> {
    /// `true` while the entry may still be served.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) < ttl
    }
}

/// Keyed TTL cache.
pub struct RegistryCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl<T> RegistryCache<T> {
    /// Create an empty cache on the system clock with [`DEFAULT_TTL`].
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Errors from `fetch` are returned unchanged and leave the cache as it was.
    pub fn get<F>(&self, key: &str, ttl: Duration, fetch: F) -> SeedlingResult<Arc<T>>
    where
        F: FnOnce() -> SeedlingResult<T>,
    {
        {
            let entries = self.entries.lock().map_err(|_| ApplicationError::CacheLock)?;
            if let Some(entry) = entries.get(key) {
                if entry.is_fresh(self.clock.now(), ttl) {
                    trace!(key, "cache hit");
                    return Ok(Arc::clone(&entry.data));
                }
                debug!(key, "cache entry expired");
            }
        }

        debug!(key, "cache miss, fetching");
        let data = Arc::new(fetch()?);

        let mut entries = self.entries.lock().map_err(|_| ApplicationError::CacheLock)?;
        entries.insert(
            key.to_owned(),
            CacheEntry {
                data: Arc::clone(&data),
                timestamp: self.clock.now(),
            },
        );
        Ok(data)
    }

    /// [`get`](Self::get) with the cache's default TTL.
    pub fn get_or_fetch<F>(&self, key: &str, fetch: F) -> SeedlingResult<Arc<T>>
    where
        F: FnOnce() -> SeedlingResult<T>,
    {
        self.get(key, self.default_ttl, fetch)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        // A poisoned map is still cleared; there is nothing to preserve.
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for RegistryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RegistryCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCache")
            .field("entries", &self.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
