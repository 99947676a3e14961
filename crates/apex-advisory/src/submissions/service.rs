use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::info;

use super::booking::{BookingReceipt, BookingRequest};
use super::contact::ContactRequest;
use super::dispatch::{DispatchError, NotificationDispatcher};
use super::ValidationError;
use crate::config::{EmailConfig, FormattingConfig};

/// Service composing the validator, formatter, submission logger, and
/// notification dispatcher. Stateless across requests; every call is an
/// independent unit of work.
pub struct SubmissionService<D> {
    dispatcher: Arc<D>,
    formatting: FormattingConfig,
    email: EmailConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl<D> SubmissionService<D>
where
    D: NotificationDispatcher + 'static,
{
    pub fn new(dispatcher: Arc<D>, formatting: FormattingConfig, email: EmailConfig) -> Self {
        Self {
            dispatcher,
            formatting,
            email,
        }
    }

    /// Run a contact submission through the pipeline. A rejected payload
    /// never reaches the formatter or the logger.
    pub async fn handle_contact(&self, request: ContactRequest) -> Result<(), SubmissionError> {
        let submission = request.validate()?;
        let now = Utc::now();
        let notice = submission.internal_notice(&self.formatting, now);

        info!(
            name = %submission.name,
            email = %submission.email,
            phone = ?submission.phone,
            company = ?submission.company,
            service = ?submission.service,
            timestamp = %now.to_rfc3339(),
            "contact form submission"
        );

        self.dispatcher
            .send_internal_notification(&notice.subject, &notice.body, &self.email.internal_recipients)
            .await?;

        Ok(())
    }

    /// Run a booking submission through the pipeline: internal notification
    /// first, then the submitter's confirmation, then the receipt.
    pub async fn handle_booking(
        &self,
        request: BookingRequest,
    ) -> Result<BookingReceipt, SubmissionError> {
        let today = Local::now().date_naive();
        let submission = request.validate(today)?;

        let now = Utc::now();
        let display = submission.display(&self.formatting);
        let notice = submission.internal_notice(&display, &self.formatting, now);
        let confirmation = submission.confirmation(&display);

        info!(
            full_name = %submission.full_name(),
            email = %submission.email,
            phone = %submission.phone,
            company = %submission.company,
            service = %submission.service,
            appointment_date = %submission.date,
            format = %submission.format,
            urgency = ?submission.urgency,
            timestamp = %now.to_rfc3339(),
            "booking submission"
        );

        self.dispatcher
            .send_internal_notification(&notice.subject, &notice.body, &self.email.internal_recipients)
            .await?;
        self.dispatcher
            .send_confirmation(&submission.email, &confirmation.subject, &confirmation.body)
            .await?;

        Ok(BookingReceipt {
            reference: format!(
                "{}-{}",
                self.formatting.reference_prefix,
                now.timestamp_millis()
            ),
            full_name: submission.full_name(),
            email: submission.email.clone(),
            date: display.date,
            time: display.time,
            format: submission.format.clone(),
            service: submission.service.clone(),
        })
    }
}
