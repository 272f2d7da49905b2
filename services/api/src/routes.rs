use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tender_criteria::criteria::{criteria_router, CriteriaRepository, CriteriaService, IdGenerator};

pub(crate) fn with_criteria_routes<R, G>(service: Arc<CriteriaService<R, G>>) -> axum::Router
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    criteria_router(service)
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
    use crate::infra::InMemoryCriteriaRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tender_criteria::criteria::UuidIdGenerator;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(CriteriaService::new(
            Arc::new(InMemoryCriteriaRepository::default()),
            Arc::new(UuidIdGenerator),
        ));
        with_criteria_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let state = state(false);
        let router = app(state.clone());

        let pending = router
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(pending.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let ready = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_criteria_routes_share_the_router() {
        let router = app(state(true));

        let health = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let missing = router
            .oneshot(
                Request::get("/api/v1/processes/ocds-404/criteria")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let response = metrics_endpoint(Extension(state(true))).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
