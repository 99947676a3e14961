use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::booking::BookingRequest;
use super::contact::ContactRequest;
use super::dispatch::NotificationDispatcher;
use super::service::{SubmissionError, SubmissionService};

/// Router for the two form endpoints. Every response carries the permissive
/// CORS headers; preflight requests are acknowledged before routing and any
/// verb other than POST/OPTIONS is answered with a 405 JSON error.
pub fn submission_router<D>(service: Arc<SubmissionService<D>>) -> Router
where
    D: NotificationDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/contact",
            post(contact_handler::<D>).fallback(method_not_allowed),
        )
        .route(
            "/api/booking",
            post(booking_handler::<D>).fallback(method_not_allowed),
        )
        .layer(middleware::from_fn(cors_gate))
        .with_state(service)
}

fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

/// Preflight requests terminate here with an empty 200; everything else is
/// routed and the CORS headers are stamped onto the outgoing response.
async fn cors_gate(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        apply_cors(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors(response.headers_mut());
    response
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        axum::Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

pub(crate) async fn contact_handler<D>(
    State(service): State<Arc<SubmissionService<D>>>,
    axum::Json(request): axum::Json<ContactRequest>,
) -> Response
where
    D: NotificationDispatcher + 'static,
{
    match service.handle_contact(request).await {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Message sent successfully",
            })),
        )
            .into_response(),
        Err(SubmissionError::Validation(error)) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(SubmissionError::Dispatch(error)) => {
            tracing::error!(%error, "contact form dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "error": "Internal server error",
                    "message": "Failed to send message. Please try again.",
                })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn booking_handler<D>(
    State(service): State<Arc<SubmissionService<D>>>,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    D: NotificationDispatcher + 'static,
{
    match service.handle_booking(request).await {
        Ok(receipt) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Consultation booked successfully",
                "booking": receipt,
            })),
        )
            .into_response(),
        Err(SubmissionError::Validation(error)) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(SubmissionError::Dispatch(error)) => {
            tracing::error!(%error, "booking dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "error": "Internal server error",
                    "message": "Failed to book consultation. Please try again or call us directly.",
                })),
            )
                .into_response()
        }
    }
}
