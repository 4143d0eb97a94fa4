//! Single-flight result cache for external command executions
//!
//! The cache exclusively owns its entries: all access goes through
//! [`ResultCache::get_or_execute`]. For a given key at most one execution
//! is ever in flight; concurrent callers attach to the pending execution
//! and observe its outcome. Completed results are memoized with a bounded
//! TTL and LRU-capped capacity.

pub mod keys;

pub use keys::{cache_key, canonicalize};

use codescout_core::constants::{
    COALESCE_WAIT_TIMEOUT, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL,
};
use codescout_core::{Error, ExecutionResult, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// Cache tuning parameters
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long completed entries remain servable
    pub ttl: Duration,
    /// Maximum number of memoized entries before LRU eviction
    pub capacity: usize,
    /// How long an attached caller waits for the in-flight execution
    pub wait_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            capacity: DEFAULT_CACHE_CAPACITY,
            wait_timeout: COALESCE_WAIT_TIMEOUT,
        }
    }
}

/// Outcome shared between the executing caller and attached waiters.
/// Fatal errors are not `Clone`, so they cross as their display string.
type SharedOutcome = std::result::Result<ExecutionResult, String>;

#[derive(Clone)]
struct InFlight {
    notify: Arc<Notify>,
    slot: Arc<OnceCell<SharedOutcome>>,
}

impl InFlight {
    fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            slot: Arc::new(OnceCell::new()),
        }
    }
}

/// Removes the in-flight entry and wakes attached waiters when the
/// leader finishes or is cancelled. The slot is marked before waiters are
/// notified, so a dropped leader future cannot strand its key: waiters
/// observe a cancellation error and fresh callers start a new flight.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<String, InFlight>,
    flight: InFlight,
    key: String,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // No-op when the leader already published its outcome
        let _ = self
            .flight
            .slot
            .set(Err("execution cancelled before completing".to_string()));
        self.in_flight.remove(&self.key);
        self.flight.notify.notify_waiters();
    }
}

struct MemoEntry {
    result: ExecutionResult,
    created_at: Instant,
    ttl: Duration,
}

impl MemoEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Counters for observing cache behavior
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    executions: AtomicU64,
    coalesced: AtomicU64,
}

/// Point-in-time snapshot of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub executions: u64,
    pub coalesced: u64,
}

/// Memoizing, single-flight cache over execution results
pub struct ResultCache {
    entries: Mutex<LruCache<String, MemoEntry>>,
    in_flight: DashMap<String, InFlight>,
    config: CacheConfig,
    stats: CacheStats,
}

impl ResultCache {
    /// Create a cache with the given configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.capacity).ok_or_else(|| {
            Error::configuration("cache capacity must be greater than zero".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: DashMap::new(),
            config,
            stats: CacheStats::default(),
        })
    }

    /// Create a cache with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(CacheConfig::default())
    }

    /// Serve `key` from the memo store or the in-flight execution, or run
    /// `compute` as the single leader for this key.
    ///
    /// With `cache_enabled` false the memo store is bypassed, but the
    /// in-flight guard still bounds concurrent identical requests to one
    /// underlying execution.
    pub async fn get_or_execute<F, Fut>(
        &self,
        key: &str,
        cache_enabled: bool,
        compute: F,
    ) -> Result<ExecutionResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ExecutionResult>>,
    {
        if cache_enabled {
            if let Some(hit) = self.lookup(key) {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key, "cache hit");
                return Ok(hit);
            }
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }

        // Check-and-insert is atomic under the dashmap shard lock
        let flight = InFlight::new();
        let existing = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(occupied) => Some(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                vacant.insert(flight.clone());
                None
            }
        };

        if let Some(existing) = existing {
            self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key, "coalescing onto in-flight execution");
            return self.wait_for_leader(key, cache_enabled, existing).await;
        }

        // Cleanup runs on drop, not only on normal completion: if this
        // future is aborted mid-compute the guard still retires the
        // flight instead of leaving the key pointing at a dead entry
        let guard = FlightGuard {
            in_flight: &self.in_flight,
            flight: flight.clone(),
            key: key.to_string(),
        };

        self.stats.executions.fetch_add(1, Ordering::Relaxed);
        let result = compute().await;

        match &result {
            Ok(value) => {
                if cache_enabled {
                    self.insert(key, value.clone());
                }
                let _ = flight.slot.set(Ok(value.clone()));
            }
            Err(e) => {
                let _ = flight.slot.set(Err(e.to_string()));
            }
        }

        // Publish before waking waiters; attached callers read the slot
        drop(guard);

        result
    }

    async fn wait_for_leader(
        &self,
        key: &str,
        cache_enabled: bool,
        flight: InFlight,
    ) -> Result<ExecutionResult> {
        let deadline = Instant::now() + self.config.wait_timeout;

        loop {
            let notified = flight.notify.notified();
            tokio::pin!(notified);

            // Store a wakeup before checking the slot; a leader that
            // publishes between the check and the await still wakes us.
            // `notified()` alone only registers on first poll.
            notified.as_mut().enable();

            if let Some(outcome) = flight.slot.get() {
                return Self::share(outcome);
            }

            if cache_enabled {
                if let Some(hit) = self.lookup(key) {
                    return Ok(hit);
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::timeout(
                    format!("wait for coalesced execution of '{key}'"),
                    self.config.wait_timeout,
                ));
            }

            let _ = tokio::time::timeout(remaining, notified).await;
        }
    }

    fn share(outcome: &SharedOutcome) -> Result<ExecutionResult> {
        match outcome {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(Error::configuration(format!(
                "coalesced execution failed: {message}"
            ))),
        }
    }

    fn lookup(&self, key: &str) -> Option<ExecutionResult> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.result.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    fn insert(&self, key: &str, result: ExecutionResult) {
        let mut entries = self.entries.lock();
        entries.put(
            key.to_string(),
            MemoEntry {
                result,
                created_at: Instant::now(),
                ttl: self.config.ttl,
            },
        );
    }

    /// Drop all expired entries
    pub fn sweep_expired(&self) {
        let mut entries = self.entries.lock();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            entries.pop(&key);
        }
    }

    /// Number of memoized entries currently retained
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove all entries and forget in-flight bookkeeping
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.in_flight.clear();
    }

    /// Snapshot of the behavior counters
    #[must_use]
    pub fn stats(&self) -> CacheStatSnapshot {
        CacheStatSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            executions: self.stats.executions.load(Ordering::Relaxed),
            coalesced: self.stats.coalesced.load(Ordering::Relaxed),
        }
    }
}
