//! Mail dispatch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use thiserror::Error;

use super::message::OutboundMessage;
use super::smtp::SmtpTransport;
use super::submission::Submission;
use crate::config::{redacted, SmtpConfig};

/// Reasons a dispatch can fail.
///
/// The HTTP layer collapses all of these into one generic response; the
/// variants exist for operator logs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Transport settings are incomplete or unparseable.
    #[error("transport configuration incomplete: {0}")]
    Config(String),

    /// The mail server could not be reached or the session failed.
    #[error("could not reach mail server: {0}")]
    Connection(String),

    /// The mail server refused the message.
    #[error("mail server rejected the message: {0}")]
    Rejected(String),

    /// The message could not be assembled.
    #[error("could not build message: {0}")]
    Message(String),

    /// The send did not finish in time.
    #[error("mail transport timed out after {0:?}")]
    Timeout(Duration),
}

impl DispatchError {
    /// Whether the same send might succeed if attempted again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, DispatchError::Connection(_) | DispatchError::Timeout(_))
    }
}

/// Outbound transport settings as configured at startup.
///
/// Incomplete values are allowed here; they are checked by
/// [`TransportConfig::resolve`] on every dispatch.
#[derive(Clone)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl From<&SmtpConfig> for TransportConfig {
    fn from(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            secure: config.secure,
            user: config.user.clone(),
            password: config.password.clone(),
            from: config.from.clone(),
            to: config.contact_email.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl TransportConfig {
    /// Check completeness and apply address fallbacks.
    ///
    /// `from` and `to` both fall back to the login user.
    pub fn resolve(&self) -> Result<SmtpSettings, DispatchError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(DispatchError::Config("SMTP host is not set".to_string()));
        }

        let (Some(user), Some(password)) = (self.user.as_ref(), self.password.as_ref()) else {
            return Err(DispatchError::Config(
                "SMTP credentials are not set".to_string(),
            ));
        };

        let from = parse_mailbox("sender", self.from.as_ref().unwrap_or(user))?;
        let to = parse_mailbox("recipient", self.to.as_ref().unwrap_or(user))?;

        Ok(SmtpSettings {
            host: host.to_string(),
            port: self.port,
            secure: self.secure,
            user: user.clone(),
            password: password.clone(),
            from,
            to,
            timeout: self.timeout,
        })
    }
}

fn parse_mailbox(role: &str, value: &str) -> Result<Mailbox, DispatchError> {
    value
        .parse()
        .map_err(|e| DispatchError::Config(format!("{role} address {value:?} is invalid: {e}")))
}

/// Complete settings for one send.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
    pub from: Mailbox,
    pub to: Mailbox,
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Something that can deliver a composed message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt delivery once.
    async fn deliver(
        &self,
        settings: &SmtpSettings,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError>;
}

/// Sends validated submissions through a [`MailTransport`].
#[derive(Clone)]
pub struct Dispatcher {
    config: TransportConfig,
    transport: Arc<dyn MailTransport>,
}

impl Dispatcher {
    /// Create a dispatcher with an explicit transport.
    pub fn new(config: TransportConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Create a dispatcher that sends over SMTP.
    pub fn smtp(config: TransportConfig) -> Self {
        Self::new(config, Arc::new(SmtpTransport))
    }

    /// Compose and send a submission. Exactly one attempt is made.
    pub async fn dispatch(&self, submission: &Submission) -> Result<(), DispatchError> {
        let settings = self.config.resolve()?;
        let message = OutboundMessage::compose(submission);

        match tokio::time::timeout(settings.timeout, self.transport.deliver(&settings, &message))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout(settings.timeout)),
        }
    }
}
