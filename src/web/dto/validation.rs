//! Validating extractor for contact submissions.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::contact::{validate_submission, Submission, ValidationError};
use crate::web::error::ApiError;

/// Extracts a validated [`Submission`] from a JSON body.
///
/// The body is first read as untyped JSON so that type mismatches and
/// missing fields are reported per field rather than as a single
/// deserialization error. Unparseable bodies are rejected with the same 400
/// shape as field violations.
///
/// # Example
///
/// ```ignore
/// use folio::web::dto::ValidatedSubmission;
///
/// async fn send(ValidatedSubmission(submission): ValidatedSubmission) -> StatusCode {
///     // submission is already validated
///     // ...
/// }
/// ```
pub struct ValidatedSubmission(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for ValidatedSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| reject(malformed(e)))?;

        let submission = validate_submission(&value).map_err(reject)?;
        Ok(ValidatedSubmission(submission))
    }
}

fn malformed(rejection: JsonRejection) -> ValidationError {
    ValidationError::malformed(format!("Invalid JSON: {}", rejection.body_text()))
}

fn reject(err: ValidationError) -> ApiError {
    tracing::info!(
        fields = ?err.violations().iter().map(|v| v.field.as_str()).collect::<Vec<_>>(),
        "Rejected contact submission"
    );
    ApiError::validation(err)
}
