use apex_advisory::config::FormattingConfig;
use apex_advisory::error::AppError;
use apex_advisory::submissions::{BookingRequest, ContactRequest};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct PreviewArgs {
    /// Appointment date for the sample booking (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Appointment time for the sample booking (HH:MM)
    #[arg(long, default_value = "14:30")]
    pub(crate) time: String,
    /// Urgency value for the sample booking (try "urgent" or "critical")
    #[arg(long)]
    pub(crate) urgency: Option<String>,
}

/// Render the notification bodies for canned submissions so the copy can be
/// reviewed without standing up an SMTP server.
pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let formatting = FormattingConfig::default();
    let now = Utc::now();
    let today = Local::now().date_naive();
    let date = args.date.unwrap_or_else(|| today + Duration::days(1));

    let contact = ContactRequest {
        name: Some("Jane Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: None,
        company: Some("Doe Holdings".to_string()),
        service: Some("Business Restructuring".to_string()),
        message: Some("We need help restructuring our Gauteng operation.".to_string()),
    };

    match contact.validate() {
        Ok(submission) => {
            let notice = submission.internal_notice(&formatting, now);
            println!("=== Contact: internal notification ===");
            println!("Subject: {}", notice.subject);
            println!("{}", notice.body);
        }
        Err(error) => println!("sample contact payload rejected: {error}"),
    }

    let booking = BookingRequest {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: Some("+27 82 456 7890".to_string()),
        company: Some("Doe Holdings".to_string()),
        position: Some("Director".to_string()),
        service: Some("Business Restructuring".to_string()),
        date: Some(date.format("%Y-%m-%d").to_string()),
        time: Some(args.time.clone()),
        format: Some("Video Call".to_string()),
        urgency: args.urgency.clone(),
        details: Some("Cash flow review ahead of the new financial year.".to_string()),
        consent: true,
    };

    match booking.validate(today) {
        Ok(submission) => {
            let display = submission.display(&formatting);
            let notice = submission.internal_notice(&display, &formatting, now);
            println!("=== Booking: internal notification ===");
            println!("Subject: {}", notice.subject);
            println!("{}", notice.body);

            let confirmation = submission.confirmation(&display);
            println!("=== Booking: client confirmation ===");
            println!("Subject: {}", confirmation.subject);
            println!("{}", confirmation.body);
        }
        Err(error) => println!("sample booking payload rejected: {error}"),
    }

    Ok(())
}
