//! OpenAPI document for the public API.

use axum::Json;
use utoipa::OpenApi;

use crate::contact::{FieldViolation, ViolationCode};
use crate::github::RepoStats;
use crate::web::dto::{ContactRequest, ContactResponse, StatsFailureResponse};
use crate::web::error::ErrorBody;
use crate::web::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "folio",
        description = "Portfolio site backend: contact relay and GitHub stats proxy"
    ),
    paths(handlers::contact::send_contact, handlers::github::repo_stats),
    components(schemas(
        ContactRequest,
        ContactResponse,
        ErrorBody,
        FieldViolation,
        ViolationCode,
        RepoStats,
        StatsFailureResponse
    )),
    tags(
        (name = "Contact", description = "Contact form relay"),
        (name = "GitHub", description = "Repository stats proxy")
    )
)]
pub struct ApiDoc;

/// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
