//! API handlers.

pub mod contact;
pub mod github;

pub use contact::*;
pub use github::*;

use crate::config::Config;
use crate::contact::{Dispatcher, TransportConfig};
use crate::github::RepoStatsProxy;
use crate::Result;

/// Shared, read-only application state.
pub struct AppState {
    /// Contact relay dispatcher.
    pub dispatcher: Dispatcher,
    /// Repository stats proxy.
    pub repo_stats: RepoStatsProxy,
}

impl AppState {
    /// Create application state from its parts.
    pub fn new(dispatcher: Dispatcher, repo_stats: RepoStatsProxy) -> Self {
        Self {
            dispatcher,
            repo_stats,
        }
    }

    /// Build production state: SMTP transport and live GitHub client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dispatcher = Dispatcher::smtp(TransportConfig::from(&config.smtp));
        let repo_stats = RepoStatsProxy::new(&config.github)?;
        Ok(Self::new(dispatcher, repo_stats))
    }
}
