//! SMTP transport backed by lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::dispatch::{DispatchError, MailTransport, SmtpSettings};
use super::message::OutboundMessage;

/// Sends mail over SMTP, opening a fresh connection per message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransport;

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn deliver(
        &self,
        settings: &SmtpSettings,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        let email = build_email(settings, message)?;
        let mailer = build_mailer(settings)?;

        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            secure = settings.secure,
            "Sending contact message"
        );

        mailer
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, settings))
    }
}

/// Build the MIME message with plain-text and HTML alternatives.
fn build_email(settings: &SmtpSettings, message: &OutboundMessage) -> Result<Message, DispatchError> {
    let reply_to: Mailbox = message
        .reply_to
        .parse()
        .map_err(|e| DispatchError::Message(format!("invalid reply-to address: {e}")))?;

    Message::builder()
        .from(settings.from.clone())
        .to(settings.to.clone())
        .reply_to(reply_to)
        .subject(message.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|e| DispatchError::Message(e.to_string()))
}

/// Implicit TLS when `secure`, STARTTLS otherwise.
fn build_mailer(settings: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, DispatchError> {
    let builder = if settings.secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
    }
    .map_err(|e| DispatchError::Config(format!("invalid SMTP host {}: {e}", settings.host)))?;

    Ok(builder
        .port(settings.port)
        .credentials(Credentials::new(
            settings.user.clone(),
            settings.password.clone(),
        ))
        .timeout(Some(settings.timeout))
        .build())
}

fn classify(err: lettre::transport::smtp::Error, settings: &SmtpSettings) -> DispatchError {
    if err.is_timeout() {
        DispatchError::Timeout(settings.timeout)
    } else if err.is_permanent() || err.is_transient() {
        // The server answered with a negative reply code.
        DispatchError::Rejected(err.to_string())
    } else {
        DispatchError::Connection(err.to_string())
    }
}
