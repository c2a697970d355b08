//! Contact form handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{ContactResponse, ValidatedSubmission, CONTACT_FAILURE_MESSAGE};
use crate::web::error::ApiError;

/// POST /api/contact - Relay a contact form submission by email.
///
/// Validation failures return 400 with every violated field. Any dispatch
/// failure is logged and answered with a generic 500.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    request_body = crate::web::dto::ContactRequest,
    responses(
        (status = 200, description = "Email sent", body = ContactResponse),
        (status = 400, description = "Validation failed", body = crate::web::error::ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = crate::web::error::ErrorBody),
        (status = 500, description = "Email could not be sent", body = crate::web::error::ErrorBody)
    )
)]
pub async fn send_contact(
    State(state): State<Arc<AppState>>,
    ValidatedSubmission(submission): ValidatedSubmission,
) -> Result<Json<ContactResponse>, ApiError> {
    match state.dispatcher.dispatch(&submission).await {
        Ok(()) => {
            tracing::info!("Contact email sent");
            Ok(Json(ContactResponse::sent()))
        }
        Err(e) => {
            tracing::error!(error = %e, transient = e.is_transient(), "Contact form error");
            Err(ApiError::internal(CONTACT_FAILURE_MESSAGE))
        }
    }
}
