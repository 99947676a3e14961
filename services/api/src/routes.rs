use crate::infra::AppState;
use apex_advisory::submissions::{submission_router, NotificationDispatcher, SubmissionService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Form endpoints plus the service's own probes. The probes sit outside the
/// CORS/method gate that guards the form routes.
pub(crate) fn with_site_routes<D>(service: Arc<SubmissionService<D>>) -> axum::Router
where
    D: NotificationDispatcher + 'static,
{
    submission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_advisory::config::{EmailConfig, FormattingConfig};
    use apex_advisory::submissions::{DispatchError, SimulatedDispatcher};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct RefusingDispatcher;

    #[async_trait]
    impl apex_advisory::submissions::NotificationDispatcher for RefusingDispatcher {
        async fn send_internal_notification(
            &self,
            _subject: &str,
            _body: &str,
            _recipients: &[String],
        ) -> Result<(), DispatchError> {
            Err(DispatchError::Delivery("relay unreachable".to_string()))
        }

        async fn send_confirmation(
            &self,
            _to_address: &str,
            _subject: &str,
            _html_body: &str,
        ) -> Result<(), DispatchError> {
            Err(DispatchError::Delivery("relay unreachable".to_string()))
        }
    }

    fn email_config() -> EmailConfig {
        EmailConfig {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "no-reply@apexadvisory.co.za".to_string(),
            internal_recipients: vec!["consulting@apexadvisory.co.za".to_string()],
            simulated_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn form_routes_are_mounted_alongside_probes() {
        let service = Arc::new(SubmissionService::new(
            Arc::new(SimulatedDispatcher::new(std::time::Duration::from_millis(0))),
            FormattingConfig::default(),
            email_config(),
        ));
        let router = with_site_routes(service);

        let response = router
            .oneshot(
                Request::options("/api/booking")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn dispatch_failures_do_not_escape_the_handler() {
        let service = Arc::new(SubmissionService::new(
            Arc::new(RefusingDispatcher),
            FormattingConfig::default(),
            email_config(),
        ));
        let router = with_site_routes(service);

        let payload = json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "message": "Need advice",
        });
        let response = router
            .oneshot(
                Request::post("/api/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&payload).expect("payload serializes"),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
