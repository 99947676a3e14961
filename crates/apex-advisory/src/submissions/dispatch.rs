use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::info;

use crate::config::EmailConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid mail address '{0}'")]
    Address(String),
    #[error("unable to compose message: {0}")]
    Compose(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Outbound email capability. Handlers call this after logging and before
/// responding; any failure maps to the 500 path. Retry policy belongs to the
/// implementation behind this seam, never to the submission pipeline.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a plain-text notice to the internal inboxes.
    async fn send_internal_notification(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), DispatchError>;

    /// Deliver an HTML confirmation to the submitter.
    async fn send_confirmation(
        &self,
        to_address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DispatchError>;
}

/// Default dispatcher: logs the would-be delivery and sleeps for a fixed
/// interval to model the latency of a real send. Never fails.
#[derive(Debug, Clone)]
pub struct SimulatedDispatcher {
    delay: Duration,
}

impl SimulatedDispatcher {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(Duration::from_millis(config.simulated_delay_ms))
    }
}

#[async_trait]
impl NotificationDispatcher for SimulatedDispatcher {
    async fn send_internal_notification(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), DispatchError> {
        info!(
            %subject,
            recipients = recipients.len(),
            bytes = body.len(),
            "simulated internal notification"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn send_confirmation(
        &self,
        to_address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DispatchError> {
        info!(
            to = %to_address,
            %subject,
            bytes = html_body.len(),
            "simulated confirmation"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// SMTP dispatcher built on lettre. Relay with STARTTLS when credentials are
/// configured, an unauthenticated connection otherwise (local catch-all
/// servers such as MailDev).
pub struct SmtpDispatcher {
    mailer: SmtpTransport,
    from: String,
}

impl SmtpDispatcher {
    pub fn new(config: &EmailConfig) -> Result<Self, DispatchError> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "SMTP transport initialized with authentication and TLS"
            );
            let credentials = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );
            SmtpTransport::relay(&config.smtp_host)
                .map_err(|err| DispatchError::Delivery(err.to_string()))?
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.from_address.clone(),
        })
    }

    fn compose(
        &self,
        to_address: &str,
        subject: &str,
        content_type: ContentType,
        body: &str,
    ) -> Result<Message, DispatchError> {
        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| DispatchError::Address(self.from.clone()))?,
            )
            .to(to_address
                .parse()
                .map_err(|_| DispatchError::Address(to_address.to_string()))?)
            .subject(subject)
            .header(content_type)
            .body(body.to_string())
            .map_err(|err| DispatchError::Compose(err.to_string()))
    }
}

#[async_trait]
impl NotificationDispatcher for SmtpDispatcher {
    async fn send_internal_notification(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), DispatchError> {
        for recipient in recipients {
            let message = self.compose(recipient, subject, ContentType::TEXT_PLAIN, body)?;
            self.mailer
                .send(&message)
                .map_err(|err| DispatchError::Delivery(err.to_string()))?;
            info!(to = %recipient, %subject, "internal notification delivered");
        }
        Ok(())
    }

    async fn send_confirmation(
        &self,
        to_address: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DispatchError> {
        let message = self.compose(to_address, subject, ContentType::TEXT_HTML, html_body)?;
        self.mailer
            .send(&message)
            .map_err(|err| DispatchError::Delivery(err.to_string()))?;
        info!(to = %to_address, %subject, "confirmation delivered");
        Ok(())
    }
}
