//! GitHub repository stats proxy.
//!
//! A read-through cache in front of the GitHub REST API. Callers that cannot
//! get fresh stats fall back to [`RepoStats::default`] instead of failing.

mod cache;
mod client;
mod types;

pub use cache::StatsCache;
pub use client::{FetchError, GithubClient};
pub use types::{GitHubRepo, RepoId, RepoIdError, RepoStats, MAX_OWNER_LENGTH, MAX_REPO_NAME_LENGTH};

use std::time::Duration;

use crate::config::GithubConfig;
use crate::Result;

/// Read-through stats proxy.
#[derive(Debug)]
pub struct RepoStatsProxy {
    client: GithubClient,
    cache: StatsCache,
}

impl RepoStatsProxy {
    /// Create a proxy from configuration.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        Ok(Self {
            client: GithubClient::new(config)?,
            cache: StatsCache::new(Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    /// The cache backing this proxy.
    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    /// Stats for a repository, from cache when fresh.
    ///
    /// Failures are not cached, so the next call tries upstream again.
    pub async fn stats(&self, repo: &RepoId) -> std::result::Result<RepoStats, FetchError> {
        let key = repo.cache_key();
        if let Some(stats) = self.cache.get(&key).await {
            tracing::debug!(repo = %repo, "Serving repository stats from cache");
            return Ok(stats);
        }

        let stats = self.client.fetch(repo).await?;

        let purged = self.cache.purge_expired().await;
        if purged > 0 {
            tracing::debug!(purged, "Dropped stale repository stats");
        }
        self.cache.insert(key, stats.clone()).await;

        Ok(stats)
    }
}
