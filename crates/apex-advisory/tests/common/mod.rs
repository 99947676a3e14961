#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, FixedOffset, Local};

use apex_advisory::config::{EmailConfig, FormattingConfig};
use apex_advisory::submissions::{
    BookingRequest, ContactRequest, DispatchError, NotificationDispatcher, SubmissionService,
};

#[derive(Debug, Clone)]
pub struct InternalSend {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConfirmationSend {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Test double capturing every dispatched notification.
#[derive(Default)]
pub struct RecordingDispatcher {
    internal: Mutex<Vec<InternalSend>>,
    confirmations: Mutex<Vec<ConfirmationSend>>,
}

impl RecordingDispatcher {
    pub fn internal_sends(&self) -> Vec<InternalSend> {
        self.internal.lock().expect("internal mutex poisoned").clone()
    }

    pub fn confirmation_sends(&self) -> Vec<ConfirmationSend> {
        self.confirmations
            .lock()
            .expect("confirmation mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_internal_notification(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), DispatchError> {
        self.internal
            .lock()
            .expect("internal mutex poisoned")
            .push(InternalSend {
                subject: subject.to_string(),
                body: body.to_string(),
                recipients: recipients.to_vec(),
            });
        Ok(())
    }

    async fn send_confirmation(
        &self,
        to_address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DispatchError> {
        self.confirmations
            .lock()
            .expect("confirmation mutex poisoned")
            .push(ConfirmationSend {
                to: to_address.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        Ok(())
    }
}

/// Test double modelling an unreachable delivery collaborator.
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send_internal_notification(
        &self,
        _subject: &str,
        _body: &str,
        _recipients: &[String],
    ) -> Result<(), DispatchError> {
        Err(DispatchError::Delivery("smtp relay offline".to_string()))
    }

    async fn send_confirmation(
        &self,
        _to_address: &str,
        _subject: &str,
        _html_body: &str,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::Delivery("smtp relay offline".to_string()))
    }
}

pub fn email_config() -> EmailConfig {
    EmailConfig {
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_address: "no-reply@apexadvisory.co.za".to_string(),
        internal_recipients: vec![
            "consulting@apexadvisory.co.za".to_string(),
            "info@apexadvisory.co.za".to_string(),
        ],
        simulated_delay_ms: 0,
    }
}

pub fn formatting_config() -> FormattingConfig {
    FormattingConfig {
        utc_offset: FixedOffset::east_opt(2 * 3600).expect("offset in range"),
        ..FormattingConfig::default()
    }
}

pub fn service_with<D>(dispatcher: Arc<D>) -> SubmissionService<D>
where
    D: NotificationDispatcher + 'static,
{
    SubmissionService::new(dispatcher, formatting_config(), email_config())
}

pub fn valid_contact() -> ContactRequest {
    ContactRequest {
        name: Some("Jane Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: None,
        company: None,
        service: None,
        message: Some("Need advice".to_string()),
    }
}

/// A complete booking for tomorrow, so the past-date rule never trips.
pub fn valid_booking() -> BookingRequest {
    let tomorrow = Local::now().date_naive() + Duration::days(1);
    BookingRequest {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: Some("+27 82 456 7890".to_string()),
        company: Some("Doe Holdings".to_string()),
        position: Some("Director".to_string()),
        service: Some("Business Restructuring".to_string()),
        date: Some(tomorrow.format("%Y-%m-%d").to_string()),
        time: Some("14:30".to_string()),
        format: Some("Video Call".to_string()),
        urgency: None,
        details: Some("Cash flow review".to_string()),
        consent: true,
    }
}
