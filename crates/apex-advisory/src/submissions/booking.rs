use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::{email_is_valid, escape_html, required, RenderedNotice, ValidationError, NOT_PROVIDED};
use crate::config::FormattingConfig;

/// Raw consultation-booking payload as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub format: Option<String>,
    pub urgency: Option<String>,
    pub details: Option<String>,
    pub consent: bool,
}

impl BookingRequest {
    /// Normalize the payload or report the first failing rule. Checks run in
    /// a fixed priority order: required fields, consent, email shape, date
    /// and time parse, date-in-past. The past-date check compares calendar
    /// days only; time-of-day never rescues a past date.
    pub fn validate(self, today: NaiveDate) -> Result<BookingSubmission, ValidationError> {
        let first_name = required(self.first_name)?;
        let last_name = required(self.last_name)?;
        let email = required(self.email)?;
        let phone = required(self.phone)?;
        let company = required(self.company)?;
        let service = required(self.service)?;
        let date = required(self.date)?;
        let time = required(self.time)?;
        let format = required(self.format)?;
        let details = required(self.details)?;

        if !self.consent {
            return Err(ValidationError::ConsentRequired);
        }

        if !email_is_valid(&email) {
            return Err(ValidationError::InvalidEmailFormat);
        }

        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| ValidationError::InvalidTime)?;

        if date < today {
            return Err(ValidationError::DateInPast);
        }

        Ok(BookingSubmission {
            first_name,
            last_name,
            email,
            phone,
            company,
            position: self.position.filter(|value| !value.is_empty()),
            service,
            date,
            time,
            format,
            urgency: self.urgency.filter(|value| !value.is_empty()),
            details,
        })
    }
}

/// A validated consultation booking. Lives only for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: Option<String>,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub format: String,
    pub urgency: Option<String>,
    pub details: String,
}

/// Display priority for a booking. The urgency field itself is an open set;
/// only these two exact values get flagged treatment, everything else is
/// standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Critical,
    Urgent,
    Standard,
}

impl UrgencyTier {
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some("critical") => Self::Critical,
            Some("urgent") => Self::Urgent,
            _ => Self::Standard,
        }
    }

    /// Tag appended to the internal notification subject.
    pub fn subject_tag(self) -> &'static str {
        match self {
            Self::Critical => "URGENT",
            Self::Urgent => "PRIORITY",
            Self::Standard => "Standard",
        }
    }
}

/// Date and time of the appointment as shown to humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDisplay {
    pub date: String,
    pub time: String,
}

impl BookingSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn urgency_tier(&self) -> UrgencyTier {
        UrgencyTier::classify(self.urgency.as_deref())
    }

    pub fn display(&self, formatting: &FormattingConfig) -> BookingDisplay {
        BookingDisplay {
            date: formatting.render_date(self.date),
            time: formatting.render_time(self.time),
        }
    }

    /// Plain-text notice for the internal consulting inbox.
    pub fn internal_notice(
        &self,
        display: &BookingDisplay,
        formatting: &FormattingConfig,
        booked_at: DateTime<Utc>,
    ) -> RenderedNotice {
        let mut body = String::new();
        writeln!(body, "New Consultation Booking - Apex Advisory Solutions")
            .expect("write heading");
        body.push('\n');
        writeln!(body, "CLIENT INFORMATION:").expect("write client section");
        writeln!(body, "Name: {}", self.full_name()).expect("write name");
        writeln!(body, "Email: {}", self.email).expect("write email");
        writeln!(body, "Phone: {}", self.phone).expect("write phone");
        writeln!(body, "Company: {}", self.company).expect("write company");
        writeln!(
            body,
            "Position: {}",
            self.position.as_deref().unwrap_or(NOT_PROVIDED)
        )
        .expect("write position");
        body.push('\n');
        writeln!(body, "APPOINTMENT DETAILS:").expect("write appointment section");
        writeln!(body, "Service: {}", self.service).expect("write service");
        writeln!(body, "Date: {}", display.date).expect("write date");
        writeln!(body, "Time: {}", display.time).expect("write time");
        writeln!(body, "Format: {}", self.format).expect("write format");
        writeln!(
            body,
            "Urgency: {}",
            self.urgency.as_deref().unwrap_or("Standard")
        )
        .expect("write urgency");
        body.push('\n');
        writeln!(body, "CLIENT REQUIREMENTS:").expect("write requirements section");
        writeln!(body, "{}", self.details).expect("write details");
        body.push('\n');
        writeln!(body, "---").expect("write divider");
        writeln!(body, "Booked: {}", formatting.render_timestamp(booked_at))
            .expect("write timestamp");
        writeln!(body, "Consent Given: Yes").expect("write consent");

        RenderedNotice {
            subject: format!(
                "New Consultation Booking - {} ({})",
                self.full_name(),
                self.urgency_tier().subject_tag()
            ),
            body,
        }
    }

    /// HTML confirmation for the submitter. Interpolated fields are escaped;
    /// the flagged urgency line appears only for the two recognized tiers.
    pub fn confirmation(&self, display: &BookingDisplay) -> RenderedNotice {
        let urgency_banner = match self.urgency_tier() {
            UrgencyTier::Critical => {
                "<p class=\"urgent\">URGENT/CRITICAL REQUEST - We will prioritize your booking</p>\n              "
            }
            UrgencyTier::Urgent => {
                "<p style=\"color: #f59e0b; font-weight: bold;\">URGENT REQUEST - We will expedite your booking</p>\n              "
            }
            UrgencyTier::Standard => "",
        };

        let body = format!(
            r#"<html>
  <head>
    <style>{style}</style>
  </head>
  <body>
    <div class="header">
      <h1>Consultation Booking Confirmation</h1>
      <p>Apex Advisory Solutions</p>
    </div>

    <div class="content">
      <p>Dear {full_name},</p>

      <p>Thank you for booking a consultation with Apex Advisory Solutions. We have received your booking request and our team will contact you within 24 hours to confirm your appointment.</p>

      <div class="appointment-details">
        <h3>Requested Appointment Details:</h3>
        <p><strong>Date:</strong> {date}</p>
        <p><strong>Time:</strong> {time}</p>
        <p><strong>Format:</strong> {format}</p>
        <p><strong>Service:</strong> {service}</p>
        {urgency_banner}</div>

      <h3>What happens next?</h3>
      <ol>
        <li>Our team will review your requirements and contact you within 24 hours</li>
        <li>We'll confirm your preferred appointment slot or suggest alternatives</li>
        <li>You'll receive a calendar invitation with meeting details</li>
        <li>Our expert consultant will prepare for your specific needs</li>
      </ol>

      <div class="contact-info">
        <h3>Need immediate assistance?</h3>
        <p><strong>Phone:</strong> +27 (0)11 784 5600</p>
        <p><strong>Mobile:</strong> +27 (0)82 456 7890</p>
        <p><strong>Email:</strong> consulting@apexadvisory.co.za</p>

        <p><strong>Office Hours:</strong><br>
        Monday - Friday: 08:00 - 17:00<br>
        Saturday: 09:00 - 13:00</p>
      </div>

      <p>We look forward to helping you achieve your business objectives.</p>

      <p>Best regards,<br>
      <strong>Apex Advisory Solutions</strong><br>
      Business Restructuring Experts</p>
    </div>

    <div class="footer">
      <p>Apex Advisory Solutions (Pty) Ltd | Registration: 2025/123456/07<br>
      Sandton City Office Towers, 5th Floor, South Tower, Sandton, Gauteng 2196<br>
      This email and any attachments are confidential and may be privileged.</p>
    </div>
  </body>
</html>
"#,
            style = CONFIRMATION_STYLE,
            full_name = escape_html(&self.full_name()),
            date = escape_html(&display.date),
            time = escape_html(&display.time),
            format = escape_html(&self.format),
            service = escape_html(&self.service),
            urgency_banner = urgency_banner,
        );

        RenderedNotice {
            subject: "Consultation Booking Confirmation - Apex Advisory Solutions".to_string(),
            body,
        }
    }
}

const CONFIRMATION_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; } \
.header { background: #1e3a8a; color: white; padding: 20px; text-align: center; } \
.content { padding: 20px; } \
.appointment-details { background: #f8f9fa; padding: 15px; border-radius: 8px; margin: 20px 0; } \
.footer { background: #f8f9fa; padding: 15px; text-align: center; font-size: 14px; color: #666; } \
.urgent { color: #dc2626; font-weight: bold; } \
.contact-info { margin: 20px 0; padding: 15px; background: #e3f2fd; border-radius: 8px; }";

/// Normalized and display fields echoed back to the caller on success.
///
/// The reference is a prefix plus the millisecond processing timestamp; two
/// bookings processed in the same millisecond collide and nothing checks for
/// it. Good enough for a follow-up phone call, not an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub reference: String,
    pub full_name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub format: String,
    pub service: String,
}
