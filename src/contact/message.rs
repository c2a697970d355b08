//! Outbound message composition.

use super::submission::Submission;

const SUBJECT_PREFIX: &str = "Portfolio Contact: ";

/// Email composed from a [`Submission`].
///
/// Both bodies are rendered from the same field values. Composition is pure:
/// the same submission always yields the same message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Subject line, embedding the sender's name.
    pub subject: String,
    /// Plain-text body.
    pub text_body: String,
    /// HTML body. User values are escaped.
    pub html_body: String,
    /// Reply-To address (the submitter).
    pub reply_to: String,
}

impl OutboundMessage {
    /// Compose the message for a validated submission.
    pub fn compose(submission: &Submission) -> Self {
        Self {
            subject: format!("{SUBJECT_PREFIX}{}", submission.name()),
            text_body: render_text(submission),
            html_body: render_html(submission),
            reply_to: submission.email().to_string(),
        }
    }
}

fn render_text(submission: &Submission) -> String {
    format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
        submission.name(),
        submission.email(),
        submission.message()
    )
}

fn render_html(submission: &Submission) -> String {
    let name = ammonia::clean_text(submission.name());
    let email = ammonia::clean_text(submission.email());
    let message = ammonia::clean_text(submission.message());

    format!(
        r#"<div style="font-family: monospace; max-width: 600px; padding: 20px;">
  <h2 style="color: #10b981;">New Contact Form Submission</h2>
  <div style="background: #1e293b; padding: 20px; border-radius: 8px; color: #e2e8f0;">
    <p><strong style="color: #10b981;">Name:</strong> {name}</p>
    <p><strong style="color: #10b981;">Email:</strong> {email}</p>
    <hr style="border: 1px solid #334155; margin: 20px 0;">
    <p><strong style="color: #10b981;">Message:</strong></p>
    <p style="white-space: pre-wrap;">{message}</p>
  </div>
</div>
"#
    )
}
