//! Repository stats handler.

use axum::{
    extract::{Query, State},
    http::{header::CACHE_CONTROL, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::github::RepoId;
use crate::web::dto::{RepoQuery, StatsFailureResponse};
use crate::web::error::ApiError;

/// Returned when the `repo` query parameter is absent or empty.
pub const MISSING_REPO_MESSAGE: &str = "Repository parameter is required";

/// Returned when `repo` is not an `owner/name` pair.
pub const INVALID_REPO_MESSAGE: &str = "Invalid repository identifier";

/// GET /api/github - Stats for a public GitHub repository.
///
/// Upstream failures degrade to zeroed stats with a 500 status.
#[utoipa::path(
    get,
    path = "/api/github",
    tag = "GitHub",
    params(
        ("repo" = String, Query, description = "Repository as owner/name")
    ),
    responses(
        (status = 200, description = "Repository stats", body = crate::github::RepoStats),
        (status = 400, description = "Missing or invalid repository", body = crate::web::error::ErrorBody),
        (status = 500, description = "Upstream failure, zeroed stats", body = StatsFailureResponse)
    )
)]
pub async fn repo_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Response {
    let Some(raw) = query.repo.filter(|r| !r.trim().is_empty()) else {
        return ApiError::bad_request(MISSING_REPO_MESSAGE).into_response();
    };

    let repo: RepoId = match raw.parse() {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!(repo = %raw, error = %e, "Rejected repository identifier");
            return ApiError::bad_request(INVALID_REPO_MESSAGE).into_response();
        }
    };

    match state.repo_stats.stats(&repo).await {
        Ok(stats) => {
            let max_age = state.repo_stats.cache().ttl().as_secs();
            (
                [(CACHE_CONTROL, format!("public, max-age={}", max_age))],
                Json(stats),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(repo = %repo, error = %e, "GitHub API error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatsFailureResponse::zeroed()),
            )
                .into_response()
        }
    }
}
