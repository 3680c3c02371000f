//! Single-slot freshness cache for the upstream payload.
//!
//! Freshness is evaluated lazily on read; there is no background sweeper.

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;

/// The last successful upstream payload and when it was obtained.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Upstream response payload, kept verbatim.
    pub data: Value,
    /// When `data` was fetched.
    pub fetched_at: Instant,
}

/// Stores the single most recent successful response.
///
/// Both fields of the entry are replaced together under one write lock, so a
/// reader never observes a payload paired with another fetch's timestamp.
#[derive(Debug)]
pub struct FreshnessCache {
    slot: RwLock<Option<CacheEntry>>,
    freshness: Duration,
}

impl FreshnessCache {
    /// Create an empty cache with the given freshness window.
    #[must_use]
    pub fn new(freshness: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            freshness,
        }
    }

    /// The configured freshness window.
    #[must_use]
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns the stored entry if it is still within the freshness window at
    /// `now`; a miss otherwise, even if stale data exists underneath.
    pub async fn read(&self, now: Instant) -> Option<CacheEntry> {
        let guard = self.slot.read().await;
        guard
            .as_ref()
            .filter(|entry| now.duration_since(entry.fetched_at) < self.freshness)
            .cloned()
    }

    /// Returns the stored entry regardless of age, for fallback use.
    ///
    /// `None` only if no fetch has ever succeeded.
    pub async fn read_stale(&self) -> Option<CacheEntry> {
        self.slot.read().await.clone()
    }

    /// Replaces the stored entry with `data` fetched at `now`.
    pub async fn write(&self, data: Value, now: Instant) {
        let mut guard = self.slot.write().await;
        *guard = Some(CacheEntry {
            data,
            fetched_at: now,
        });
    }
}
