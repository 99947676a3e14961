use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Write as _;

use super::{email_is_valid, required, RenderedNotice, ValidationError, NOT_PROVIDED, NOT_SPECIFIED};
use crate::config::FormattingConfig;

/// Raw contact-form payload as posted by the site. Every field is optional
/// at the wire level; the validator decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    /// Normalize the payload or report the first failing rule: required
    /// fields, then email shape.
    pub fn validate(self) -> Result<ContactSubmission, ValidationError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let message = required(self.message)?;

        if !email_is_valid(&email) {
            return Err(ValidationError::InvalidEmailFormat);
        }

        Ok(ContactSubmission {
            name,
            email,
            phone: self.phone.filter(|value| !value.is_empty()),
            company: self.company.filter(|value| !value.is_empty()),
            service: self.service.filter(|value| !value.is_empty()),
            message,
        })
    }
}

/// A validated contact-form submission. Lives only for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// Plain-text notice for the internal inbox. Contact submissions get no
    /// client-facing confirmation body; that side stays with the delivery
    /// collaborator.
    pub fn internal_notice(
        &self,
        formatting: &FormattingConfig,
        submitted_at: DateTime<Utc>,
    ) -> RenderedNotice {
        let mut body = String::new();
        writeln!(body, "New Contact Form Submission - Apex Advisory Solutions")
            .expect("write heading");
        body.push('\n');
        writeln!(body, "Name: {}", self.name).expect("write name");
        writeln!(body, "Email: {}", self.email).expect("write email");
        writeln!(
            body,
            "Phone: {}",
            self.phone.as_deref().unwrap_or(NOT_PROVIDED)
        )
        .expect("write phone");
        writeln!(
            body,
            "Company: {}",
            self.company.as_deref().unwrap_or(NOT_PROVIDED)
        )
        .expect("write company");
        writeln!(
            body,
            "Service: {}",
            self.service.as_deref().unwrap_or(NOT_SPECIFIED)
        )
        .expect("write service");
        body.push('\n');
        writeln!(body, "Message:").expect("write message label");
        writeln!(body, "{}", self.message).expect("write message");
        body.push('\n');
        writeln!(body, "---").expect("write divider");
        writeln!(
            body,
            "Submitted: {}",
            formatting.render_timestamp(submitted_at)
        )
        .expect("write timestamp");

        RenderedNotice {
            subject: "New Contact Form Submission".to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn full_request() -> ContactRequest {
        ContactRequest {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("+27 82 456 7890".to_string()),
            company: Some("Doe Holdings".to_string()),
            service: Some("Business Restructuring".to_string()),
            message: Some("Need advice".to_string()),
        }
    }

    #[test]
    fn accepts_minimal_valid_payload() {
        let request = ContactRequest {
            phone: None,
            company: None,
            service: None,
            ..full_request()
        };
        let submission = request.validate().expect("minimal payload valid");
        assert_eq!(submission.name, "Jane Doe");
        assert!(submission.phone.is_none());
    }

    #[test]
    fn missing_required_field_wins_over_bad_email() {
        let request = ContactRequest {
            message: None,
            email: Some("not-an-email".to_string()),
            ..full_request()
        };
        assert_eq!(request.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let request = ContactRequest {
            name: Some(String::new()),
            ..full_request()
        };
        assert_eq!(request.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn bad_email_is_reported_after_required_fields_pass() {
        let request = ContactRequest {
            email: Some("not-an-email".to_string()),
            ..full_request()
        };
        assert_eq!(request.validate(), Err(ValidationError::InvalidEmailFormat));
    }

    #[test]
    fn empty_optional_fields_normalize_to_absent() {
        let request = ContactRequest {
            phone: Some(String::new()),
            service: Some(String::new()),
            ..full_request()
        };
        let submission = request.validate().expect("valid");
        assert!(submission.phone.is_none());
        assert!(submission.service.is_none());
    }

    #[test]
    fn internal_notice_renders_placeholders_for_absent_optionals() {
        let submission = ContactRequest {
            phone: None,
            company: None,
            service: None,
            ..full_request()
        }
        .validate()
        .expect("valid");

        let submitted_at = Utc.with_ymd_and_hms(2025, 9, 25, 12, 0, 5).unwrap();
        let notice = submission.internal_notice(&FormattingConfig::default(), submitted_at);

        assert_eq!(notice.subject, "New Contact Form Submission");
        assert!(notice.body.contains("Phone: Not provided"));
        assert!(notice.body.contains("Company: Not provided"));
        assert!(notice.body.contains("Service: Not specified"));
        assert!(notice.body.contains("Message:\nNeed advice"));
        assert!(notice.body.contains("Submitted: 2025/09/25, 14:00:05"));
    }

    #[test]
    fn internal_notice_is_deterministic_for_fixed_timestamp() {
        let submission = full_request().validate().expect("valid");
        let submitted_at = Utc.with_ymd_and_hms(2025, 9, 25, 12, 0, 5).unwrap();
        let formatting = FormattingConfig::default();
        let first = submission.internal_notice(&formatting, submitted_at);
        let second = submission.internal_notice(&formatting, submitted_at);
        assert_eq!(first.body, second.body);
        assert_eq!(first.subject, second.subject);
    }
}
