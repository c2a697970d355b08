//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;

/// Contact form submission.
///
/// Documents the wire shape only; bodies are validated from raw JSON by
/// [`super::ValidatedSubmission`].
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactRequest {
    /// Sender name, at least 2 characters.
    #[schema(min_length = 2, example = "Ada Lovelace")]
    pub name: String,
    /// Sender email address.
    #[schema(example = "ada@example.dev")]
    pub email: String,
    /// Message text, at least 10 characters.
    #[schema(min_length = 10, example = "I'd love to chat about your project.")]
    pub message: String,
}

/// Query for the repository stats endpoint.
#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    /// Repository as `owner/name`.
    #[serde(default)]
    pub repo: Option<String>,
}
