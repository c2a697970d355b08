//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::github::RepoStats;

/// Returned when a contact submission was handed to the mail server.
pub const CONTACT_SUCCESS_MESSAGE: &str = "Email sent successfully";

/// Returned when a contact submission could not be sent.
pub const CONTACT_FAILURE_MESSAGE: &str = "Failed to send email. Please try again later.";

/// Returned alongside zeroed stats when upstream fails.
pub const STATS_FAILURE_MESSAGE: &str = "Failed to fetch repository data";

/// Successful contact submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    /// Confirmation text.
    pub message: String,
}

impl ContactResponse {
    /// The standard success response.
    pub fn sent() -> Self {
        Self {
            message: CONTACT_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Zeroed stats served when GitHub could not be reached.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsFailureResponse {
    /// Failure description.
    pub error: String,
    /// Zero-valued stats.
    #[serde(flatten)]
    pub stats: RepoStats,
}

impl StatsFailureResponse {
    /// The standard degraded response.
    pub fn zeroed() -> Self {
        Self {
            error: STATS_FAILURE_MESSAGE.to_string(),
            stats: RepoStats::default(),
        }
    }
}
