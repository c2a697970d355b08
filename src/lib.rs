//! folio - portfolio site backend.
//!
//! A contact form relay that validates submissions and forwards them by
//! SMTP, plus a cached read-through proxy for GitHub repository stats.

pub mod config;
pub mod contact;
pub mod error;
pub mod github;
pub mod logging;
pub mod web;

pub use config::Config;
pub use contact::{
    validate_submission, DispatchError, Dispatcher, MailTransport, OutboundMessage, SmtpSettings,
    SmtpTransport, Submission, TransportConfig, ValidationError,
};
pub use error::{FolioError, Result};
pub use github::{RepoId, RepoStats, RepoStatsProxy};
pub use web::WebServer;
