//! Contact form relay.
//!
//! A submission is validated into a [`Submission`], composed into an
//! [`OutboundMessage`] and handed to a [`MailTransport`] exactly once by the
//! [`Dispatcher`]. Nothing is stored and nothing is retried.

mod dispatch;
mod message;
mod smtp;
mod submission;

pub use dispatch::{DispatchError, Dispatcher, MailTransport, SmtpSettings, TransportConfig};
pub use message::OutboundMessage;
pub use smtp::SmtpTransport;
pub use submission::{
    validate_submission, FieldViolation, Submission, ValidationError, ViolationCode,
    EMAIL_INVALID_MESSAGE, MESSAGE_TOO_SHORT_MESSAGE, NAME_TOO_SHORT_MESSAGE,
};
