//! Validation, formatting, and dispatch for the two marketing-site forms.
//!
//! Both forms share one pipeline shape: validate the raw payload into a
//! normalized submission, render notification bodies, log the submission,
//! then hand the bodies to the [`dispatch::NotificationDispatcher`].

pub mod booking;
pub mod contact;
pub mod dispatch;
pub mod router;
pub mod service;

use regex::Regex;
use std::sync::OnceLock;

pub use booking::{BookingReceipt, BookingRequest, BookingSubmission, UrgencyTier};
pub use contact::{ContactRequest, ContactSubmission};
pub use dispatch::{DispatchError, NotificationDispatcher, SimulatedDispatcher, SmtpDispatcher};
pub use router::submission_router;
pub use service::{SubmissionError, SubmissionService};

/// Placeholder rendered for absent optional fields.
pub(crate) const NOT_PROVIDED: &str = "Not provided";
pub(crate) const NOT_SPECIFIED: &str = "Not specified";

/// Exactly one failure is reported per request; the first failing rule wins
/// and carries the user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Consent is required")]
    ConsentRequired,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Invalid appointment date")]
    InvalidDate,
    #[error("Invalid appointment time")]
    InvalidTime,
    #[error("Appointment date must be in the future")]
    DateInPast,
}

/// Loose on purpose: anything shaped `local@domain.tld` passes, including
/// some malformed addresses the live site has always accepted. The
/// accept/reject boundary must not change.
pub fn email_is_valid(candidate: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let regex = PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
    regex.is_match(candidate)
}

/// A required field is present only when it deserialized to a non-empty
/// string; whitespace counts as content.
pub(crate) fn required(value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(field) if !field.is_empty() => Ok(field),
        _ => Err(ValidationError::MissingFields),
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Subject line and body of one rendered notification.
#[derive(Debug, Clone)]
pub struct RenderedNotice {
    pub subject: String,
    pub body: String,
}
