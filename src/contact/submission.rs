//! Contact submission validation.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

pub const NAME_TOO_SHORT_MESSAGE: &str = "Name must be at least 2 characters";
pub const EMAIL_INVALID_MESSAGE: &str = "Invalid email address";
pub const MESSAGE_TOO_SHORT_MESSAGE: &str = "Message must be at least 10 characters";

const REQUIRED_MESSAGE: &str = "Required";
const EXPECTED_STRING_MESSAGE: &str = "Expected string";
const EXPECTED_OBJECT_MESSAGE: &str = "Expected a JSON object";
const INVALID_VALUE_MESSAGE: &str = "Invalid value";

/// Field name used for violations that concern the whole payload.
const BODY_FIELD: &str = "body";

/// Submission fields, in reporting order.
const FIELDS: [&str; 3] = ["name", "email", "message"];

/// A fully validated contact form submission.
///
/// Only [`validate_submission`] constructs one, so holding a `Submission`
/// means every field satisfied its constraint. Values are kept exactly as
/// submitted.
///
/// Minimum lengths live in the rules below; the client-facing text for each
/// rule is looked up by field and violation code.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Submission {
    #[validate(length(min = 2))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 10))]
    message: String,
}

impl Submission {
    /// Sender name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sender email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Machine-readable reason for a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Field absent from the payload.
    Required,
    /// Field (or payload) has the wrong JSON type.
    InvalidType,
    /// Body could not be parsed as JSON at all.
    Malformed,
    /// Text shorter than the field minimum.
    TooShort,
    /// Not a valid email address.
    InvalidEmail,
    /// Any other rule failure.
    Invalid,
}

impl ViolationCode {
    fn from_rule(code: &str) -> Self {
        match code {
            "length" => ViolationCode::TooShort,
            "email" => ViolationCode::InvalidEmail,
            _ => ViolationCode::Invalid,
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    /// Offending field (`body` when the payload itself is unusable).
    pub field: String,
    /// Violation kind.
    pub code: ViolationCode,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

/// Validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .violations.len())]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// A failure for a body that could not be parsed.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::body(ViolationCode::Malformed, message)
    }

    fn body(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(BODY_FIELD, code, message)],
        }
    }

    /// Violations in field order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Consume the error and return its violations.
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

}

/// Client-facing text for a failed rule.
fn rule_message(field: &str, code: ViolationCode) -> &'static str {
    match (field, code) {
        ("name", ViolationCode::TooShort) => NAME_TOO_SHORT_MESSAGE,
        ("message", ViolationCode::TooShort) => MESSAGE_TOO_SHORT_MESSAGE,
        (_, ViolationCode::InvalidEmail) => EMAIL_INVALID_MESSAGE,
        _ => INVALID_VALUE_MESSAGE,
    }
}

/// Whether the address can also be used as a mail header.
///
/// The `email` rule is looser than RFC 5322 (it allows dots at either end of
/// the local part, or two in a row), so the address must also parse as a
/// mailbox address, and the domain must contain a dot.
fn is_deliverable_address(email: &str) -> bool {
    match email.parse::<lettre::Address>() {
        Ok(address) => {
            let domain = address.domain();
            domain.contains('.') && !domain.ends_with('.')
        }
        Err(_) => false,
    }
}

/// Read a string field, reporting missing or non-string values.
fn string_field(object: &Map<String, Value>, field: &str) -> Result<String, FieldViolation> {
    match object.get(field) {
        None => Err(FieldViolation::new(
            field,
            ViolationCode::Required,
            REQUIRED_MESSAGE,
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(FieldViolation::new(
            field,
            ViolationCode::InvalidType,
            EXPECTED_STRING_MESSAGE,
        )),
    }
}

/// Validate an untyped payload into a [`Submission`].
///
/// Every violated field is reported, in the order name, email, message.
/// Unknown fields are ignored and non-string values are never coerced.
pub fn validate_submission(payload: &Value) -> Result<Submission, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError::body(
            ViolationCode::InvalidType,
            EXPECTED_OBJECT_MESSAGE,
        ));
    };

    let values: Vec<Result<String, FieldViolation>> =
        FIELDS.iter().map(|field| string_field(object, field)).collect();

    let candidate = Submission {
        name: values[0].clone().unwrap_or_default(),
        email: values[1].clone().unwrap_or_default(),
        message: values[2].clone().unwrap_or_default(),
    };

    let rule_errors: HashMap<String, Vec<validator::ValidationError>> = match candidate.validate()
    {
        Ok(()) => HashMap::new(),
        Err(errors) => errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs.clone()))
            .collect(),
    };

    let mut violations = Vec::new();
    for (field, value) in FIELDS.iter().zip(values) {
        if let Err(violation) = value {
            violations.push(violation);
            continue;
        }
        let mut field_ok = true;
        for err in rule_errors.get(*field).into_iter().flatten() {
            let code = ViolationCode::from_rule(&err.code);
            violations.push(FieldViolation::new(field, code, rule_message(field, code)));
            field_ok = false;
        }
        if field_ok && *field == "email" && !is_deliverable_address(candidate.email()) {
            violations.push(FieldViolation::new(
                field,
                ViolationCode::InvalidEmail,
                EMAIL_INVALID_MESSAGE,
            ));
        }
    }

    if violations.is_empty() {
        Ok(candidate)
    } else {
        Err(ValidationError { violations })
    }
}
