//! In-process version cache
//!
//! Maps a watch target name to the last snapshot observed for it. Nothing is
//! persisted; a restart re-bootstraps from a fresh fetch.
//!
//! Entries can carry a time-to-live, but the watcher never sets one: the
//! baseline must survive however long the schedule interval is.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::ContentSnapshot;

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: ContentSnapshot,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Hit/miss counters, reset only by dropping the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub keys: usize,
}

/// Owned key/value store for last-seen snapshots
///
/// Not thread-safe on its own; the watcher keeps it behind the mutex that
/// also serialises cycles.
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the snapshot stored under `name`
    ///
    /// Expired entries are evicted on read and reported as absent.
    pub fn get(&mut self, name: &str) -> Option<ContentSnapshot> {
        let now = Instant::now();
        if self.entries.get(name).is_some_and(|e| e.is_expired(now)) {
            self.entries.remove(name);
        }
        match self.entries.get(name) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.snapshot.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store `snapshot` under `name` with no expiry, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, snapshot: ContentSnapshot) {
        self.entries.insert(
            name.into(),
            CacheEntry {
                snapshot,
                expires_at: None,
            },
        );
    }

    /// Store `snapshot` under `name`, evicted once `ttl` has elapsed
    pub fn set_with_ttl(&mut self, name: impl Into<String>, snapshot: ContentSnapshot, ttl: Duration) {
        self.entries.insert(
            name.into(),
            CacheEntry {
                snapshot,
                expires_at: Some(Instant::now() + ttl),
            },
        );
    }

    /// Remove the entry for `name`, returning its snapshot if it was live
    pub fn remove(&mut self, name: &str) -> Option<ContentSnapshot> {
        let now = Instant::now();
        self.entries
            .remove(name)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.snapshot)
    }

    /// Names of all live entries, sorted
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            keys: self.len(),
        }
    }
}
