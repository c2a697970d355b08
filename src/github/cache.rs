//! In-memory freshness cache for repository stats.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::types::RepoStats;

#[derive(Debug, Clone)]
struct CacheEntry {
    stats: RepoStats,
    fetched_at: Instant,
}

/// Stats cache with a fixed freshness window.
///
/// Stale entries stay in the map until the next successful fetch replaces
/// them, or until [`StatsCache::purge_expired`] runs.
#[derive(Debug)]
pub struct StatsCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl StatsCache {
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached stats if they are still fresh.
    pub async fn get(&self, key: &str) -> Option<RepoStats> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.stats.clone())
    }

    /// Store freshly fetched stats.
    pub async fn insert(&self, key: String, stats: RepoStats) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                stats,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop all stale entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
