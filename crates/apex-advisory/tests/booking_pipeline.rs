mod common;

use common::*;
use std::sync::Arc;

use apex_advisory::submissions::{SubmissionError, ValidationError};

#[tokio::test]
async fn valid_booking_yields_receipt_and_both_notifications() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = service_with(dispatcher.clone());

    let receipt = service
        .handle_booking(valid_booking())
        .await
        .expect("booking accepted");

    assert!(receipt.reference.starts_with("AAS-"));
    let suffix = &receipt.reference["AAS-".len()..];
    assert!(
        !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()),
        "reference suffix is the processing timestamp: {}",
        receipt.reference
    );
    assert_eq!(receipt.full_name, "Jane Doe");
    assert_eq!(receipt.email, "jane@example.com");
    assert_eq!(receipt.time, "02:30 PM");
    assert_eq!(receipt.format, "Video Call");
    assert_eq!(receipt.service, "Business Restructuring");

    let internal = dispatcher.internal_sends();
    assert_eq!(internal.len(), 1);
    assert!(internal[0]
        .subject
        .starts_with("New Consultation Booking - Jane Doe"));
    assert!(internal[0].body.contains("APPOINTMENT DETAILS:"));
    assert!(internal[0].body.contains(&format!("Date: {}", receipt.date)));
    assert!(internal[0].body.contains("Consent Given: Yes"));

    let confirmations = dispatcher.confirmation_sends();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].to, "jane@example.com");
    assert_eq!(
        confirmations[0].subject,
        "Consultation Booking Confirmation - Apex Advisory Solutions"
    );
    assert!(confirmations[0].html_body.contains(&receipt.date));
    assert!(confirmations[0].html_body.contains("Dear Jane Doe,"));
}

#[tokio::test]
async fn critical_booking_is_flagged_in_subject_and_confirmation() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = service_with(dispatcher.clone());

    let mut request = valid_booking();
    request.urgency = Some("critical".to_string());
    service
        .handle_booking(request)
        .await
        .expect("booking accepted");

    let internal = dispatcher.internal_sends();
    assert!(internal[0].subject.ends_with("(URGENT)"));

    let confirmations = dispatcher.confirmation_sends();
    assert!(confirmations[0]
        .html_body
        .contains("URGENT/CRITICAL REQUEST - We will prioritize your booking"));
}

#[tokio::test]
async fn missing_consent_stops_the_pipeline_before_dispatch() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = service_with(dispatcher.clone());

    let mut request = valid_booking();
    request.consent = false;
    let error = service
        .handle_booking(request)
        .await
        .expect_err("consent required");

    assert!(matches!(
        error,
        SubmissionError::Validation(ValidationError::ConsentRequired)
    ));
    assert!(dispatcher.internal_sends().is_empty());
    assert!(dispatcher.confirmation_sends().is_empty());
}

#[tokio::test]
async fn dispatcher_failure_surfaces_as_dispatch_error() {
    let service = service_with(Arc::new(FailingDispatcher));

    let error = service
        .handle_booking(valid_booking())
        .await
        .expect_err("delivery failure propagates");

    assert!(matches!(error, SubmissionError::Dispatch(_)));
}
