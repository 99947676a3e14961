use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_site_routes;
use apex_advisory::config::AppConfig;
use apex_advisory::error::AppError;
use apex_advisory::submissions::{
    NotificationDispatcher, SimulatedDispatcher, SmtpDispatcher, SubmissionService,
};
use apex_advisory::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // The dispatcher is picked once at startup: a configured SMTP host gets
    // the real transport, otherwise sends are simulated.
    let app = if config.email.smtp_configured() {
        info!(smtp_host = %config.email.smtp_host, "using SMTP notification dispatcher");
        build_app(
            Arc::new(SmtpDispatcher::new(&config.email)?),
            &config,
            app_state,
            prometheus_layer,
        )
    } else {
        info!("SMTP not configured, notification dispatch is simulated");
        build_app(
            Arc::new(SimulatedDispatcher::from_config(&config.email)),
            &config,
            app_state,
            prometheus_layer,
        )
    };

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "forms service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app<D>(
    dispatcher: Arc<D>,
    config: &AppConfig,
    app_state: AppState,
    prometheus_layer: PrometheusMetricLayer<'static>,
) -> axum::Router
where
    D: NotificationDispatcher + 'static,
{
    let service = Arc::new(SubmissionService::new(
        dispatcher,
        config.formatting.clone(),
        config.email.clone(),
    ));

    with_site_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
}
