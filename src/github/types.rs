//! Types for the repository stats proxy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Maximum owner (user or organisation) name length.
pub const MAX_OWNER_LENGTH: usize = 39;

/// Maximum repository name length.
pub const MAX_REPO_NAME_LENGTH: usize = 100;

/// Public stats for a repository.
///
/// `RepoStats::default()` is the zero value served when upstream fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepoStats {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Repository description.
    pub description: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Repository topics.
    pub topics: Vec<String>,
}

/// Subset of the GitHub `GET /repos/{owner}/{repo}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub stargazers_count: u64,
    pub forks_count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

impl From<GitHubRepo> for RepoStats {
    fn from(repo: GitHubRepo) -> Self {
        Self {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            description: repo.description,
            language: repo.language,
            topics: repo.topics.unwrap_or_default(),
        }
    }
}

/// Invalid repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoIdError {
    #[error("repository identifier is empty")]
    Empty,
    #[error("repository identifier must look like owner/name")]
    Format,
    #[error("invalid repository owner")]
    Owner,
    #[error("invalid repository name")]
    Name,
}

/// A validated `owner/name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive key, matching how GitHub resolves names.
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.owner, self.name).to_lowercase()
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner.len() <= MAX_OWNER_LENGTH
        && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_REPO_NAME_LENGTH
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepoId {
    type Err = RepoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RepoIdError::Empty);
        }

        let mut parts = s.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RepoIdError::Format);
        };

        if !is_valid_owner(owner) {
            return Err(RepoIdError::Owner);
        }
        if !is_valid_name(name) {
            return Err(RepoIdError::Name);
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_id() {
        let id: RepoId = "LuaScale/portfolio".parse().unwrap();
        assert_eq!(id.owner(), "LuaScale");
        assert_eq!(id.name(), "portfolio");
        assert_eq!(id.to_string(), "LuaScale/portfolio");
        assert_eq!(id.cache_key(), "luascale/portfolio");
    }

    #[test]
    fn test_parse_repo_id_allowed_characters() {
        assert!("rust-lang/rust.vim".parse::<RepoId>().is_ok());
        assert!("a/b_c-d.e".parse::<RepoId>().is_ok());
        assert!(" owner/name ".parse::<RepoId>().is_ok());
    }

    #[test]
    fn test_parse_repo_id_rejects_bad_shapes() {
        assert_eq!("".parse::<RepoId>(), Err(RepoIdError::Empty));
        assert_eq!("   ".parse::<RepoId>(), Err(RepoIdError::Empty));
        assert_eq!("owner".parse::<RepoId>(), Err(RepoIdError::Format));
        assert_eq!("a/b/c".parse::<RepoId>(), Err(RepoIdError::Format));
        assert_eq!("/name".parse::<RepoId>(), Err(RepoIdError::Owner));
        assert_eq!("owner/".parse::<RepoId>(), Err(RepoIdError::Name));
    }

    #[test]
    fn test_parse_repo_id_rejects_traversal() {
        assert_eq!("owner/..".parse::<RepoId>(), Err(RepoIdError::Name));
        assert_eq!("owner/.".parse::<RepoId>(), Err(RepoIdError::Name));
        assert_eq!("..%2f/name".parse::<RepoId>(), Err(RepoIdError::Owner));
        assert_eq!("own.er/name".parse::<RepoId>(), Err(RepoIdError::Owner));
        assert_eq!("owner/na?me".parse::<RepoId>(), Err(RepoIdError::Name));
    }

    #[test]
    fn test_parse_repo_id_length_limits() {
        let long_owner = format!("{}/name", "a".repeat(MAX_OWNER_LENGTH + 1));
        assert_eq!(long_owner.parse::<RepoId>(), Err(RepoIdError::Owner));

        let long_name = format!("owner/{}", "a".repeat(MAX_REPO_NAME_LENGTH + 1));
        assert_eq!(long_name.parse::<RepoId>(), Err(RepoIdError::Name));
    }

    #[test]
    fn test_github_repo_into_stats() {
        let raw: GitHubRepo = serde_json::from_str(
            r#"{
                "id": 1,
                "stargazers_count": 42,
                "forks_count": 7,
                "description": "A thing",
                "language": "Rust",
                "topics": ["cli", "web"]
            }"#,
        )
        .unwrap();

        let stats = RepoStats::from(raw);
        assert_eq!(stats.stars, 42);
        assert_eq!(stats.forks, 7);
        assert_eq!(stats.description.as_deref(), Some("A thing"));
        assert_eq!(stats.language.as_deref(), Some("Rust"));
        assert_eq!(stats.topics, vec!["cli", "web"]);
    }

    #[test]
    fn test_github_repo_missing_optionals() {
        let raw: GitHubRepo = serde_json::from_str(
            r#"{"stargazers_count": 1, "forks_count": 0, "description": null, "language": null}"#,
        )
        .unwrap();

        let stats = RepoStats::from(raw);
        assert!(stats.description.is_none());
        assert!(stats.language.is_none());
        assert!(stats.topics.is_empty());
    }

    #[test]
    fn test_zero_stats() {
        let stats = RepoStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stars": 0,
                "forks": 0,
                "description": null,
                "language": null,
                "topics": []
            })
        );
    }
}
