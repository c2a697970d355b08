//! GitHub REST API client for repository stats.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::types::{GitHubRepo, RepoId, RepoStats};
use crate::config::{redacted, GithubConfig};
use crate::error::{FolioError, Result};

/// User agent sent upstream. GitHub rejects requests without one.
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Media type for the v3 REST API.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Failure to obtain stats from upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-success status.
    #[error("GitHub API returned {0}")]
    Status(u16),

    /// Body was not a repository payload.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Client for `GET /repos/{owner}/{repo}`.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &redacted(&self.token))
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Create a client from configuration.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| FolioError::Config(format!("invalid GitHub API URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FolioError::Config(format!(
                "GitHub API URL cannot be a base: {}",
                config.api_base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FolioError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Upstream URL for a repository.
    pub fn repo_url(&self, repo: &RepoId) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner(), repo.name()]);
        }
        url
    }

    /// Fetch stats for a repository. One request, no retry.
    pub async fn fetch(&self, repo: &RepoId) -> std::result::Result<RepoStats, FetchError> {
        let mut request = self
            .client
            .get(self.repo_url(repo))
            .header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let repo: GitHubRepo =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(repo.into())
    }
}
