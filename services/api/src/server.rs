use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCriteriaRepository};
use crate::routes::with_criteria_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tender_criteria::config::AppConfig;
use tender_criteria::criteria::{CriteriaService, UuidIdGenerator};
use tender_criteria::error::AppError;
use tender_criteria::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let criteria_service = Arc::new(CriteriaService::new(
        Arc::new(InMemoryCriteriaRepository::default()),
        Arc::new(UuidIdGenerator),
    ));

    let app = with_criteria_routes(criteria_service)
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        body_limit = config.server.body_limit_bytes,
        "tender criteria service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
