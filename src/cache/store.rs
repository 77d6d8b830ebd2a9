//! In-memory response store with time-based expiry
//!
//! Provides a `Cache` that maps request URLs to raw response bodies. Every
//! entry is stamped on insertion, and a background reaper removes entries
//! older than the configured TTL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;

use super::reaper::Reaper;

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Upper bound for the reap interval derived from the TTL
const MAX_DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(1);

/// Smallest reap interval accepted by the reaper
pub(super) const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

/// A cached response body together with its insertion time
#[derive(Debug, Clone)]
struct CacheEntry {
    /// When the entry was inserted or last overwritten
    created_at: Instant,
    /// The stored bytes
    value: Vec<u8>,
}

/// Timing configuration for a `Cache`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum age an entry may reach before the reaper removes it
    pub ttl: Duration,
    /// How often the reaper sweeps the store
    pub reap_interval: Duration,
}

impl CacheConfig {
    /// Creates a config for `ttl` with the reap interval derived from it
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            reap_interval: default_reap_interval(ttl),
        }
    }

    /// Overrides the reap interval
    pub fn with_reap_interval(mut self, reap_interval: Duration) -> Self {
        self.reap_interval = reap_interval;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Reap interval used when none is configured: a fifth of the TTL, capped at one second
pub fn default_reap_interval(ttl: Duration) -> Duration {
    (ttl / 5).clamp(MIN_REAP_INTERVAL, MAX_DEFAULT_REAP_INTERVAL)
}

/// State shared between cache handles and the reaper task
#[derive(Debug)]
pub(super) struct Shared {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Shared {
    // A panic while holding the lock cannot leave a half-written entry, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes every entry older than the TTL, returning how many were dropped
    pub(super) fn reap_expired(&self) -> usize {
        let mut entries = self.write();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.created_at) <= self.ttl);
        before - entries.len()
    }

    pub(super) fn len(&self) -> usize {
        self.read().len()
    }
}

/// Thread-safe expiring cache of raw response bodies
///
/// Cloning a `Cache` creates another handle to the same store. The whole map
/// sits behind one reader/writer lock; there is no per-key locking. The
/// reaper task is spawned on construction and runs until `shutdown` is called
/// or every handle has been dropped.
#[derive(Debug, Clone)]
pub struct Cache {
    shared: Arc<Shared>,
    reaper: Reaper,
}

impl Cache {
    /// Creates an empty cache and starts its reaper
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: CacheConfig) -> Self {
        let shared = Arc::new(Shared {
            entries: RwLock::new(HashMap::new()),
            ttl: config.ttl,
        });
        let reaper = Reaper::spawn(Arc::clone(&shared), config.reap_interval);
        Self { shared, reaper }
    }

    /// Inserts or overwrites the entry for `key`, stamped with the current time
    pub fn add(&self, key: impl Into<String>, value: Vec<u8>) {
        let entry = CacheEntry {
            created_at: Instant::now(),
            value,
        };
        self.shared.write().insert(key.into(), entry);
    }

    /// Returns a copy of the bytes stored under `key`, if present
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.shared.read().get(key).map(|entry| entry.value.clone())
    }

    /// Runs one reap pass immediately, returning the number of entries removed
    pub fn reap_expired(&self) -> usize {
        self.shared.reap_expired()
    }

    /// Number of entries currently stored, including expired ones not yet reaped
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    /// Returns true if no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    /// The interval between reap passes
    pub fn reap_interval(&self) -> Duration {
        self.reaper.interval()
    }

    /// Returns true while the background reaper task is alive
    pub fn is_reaper_running(&self) -> bool {
        self.reaper.is_running()
    }

    /// Stops the reaper and waits for it to finish
    ///
    /// Stored entries remain readable; they simply stop expiring.
    pub async fn shutdown(&self) {
        self.reaper.shutdown().await;
    }
}
