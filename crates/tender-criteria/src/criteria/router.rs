use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::builder::IdGenerator;
use super::domain::{BidPayload, TenderPayload};
use super::repository::{CriteriaRepository, ProcessId, RepositoryError};
use super::service::{CriteriaService, CriteriaServiceError};

/// Router builder exposing HTTP endpoints for criteria checks and snapshots.
pub fn criteria_router<R, G>(service: Arc<CriteriaService<R, G>>) -> Router
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    Router::new()
        .route("/api/v1/criteria/check", post(check_handler::<R, G>))
        .route(
            "/api/v1/processes/:process_id/criteria",
            post(create_handler::<R, G>).get(snapshot_handler::<R, G>),
        )
        .route(
            "/api/v1/processes/:process_id/responses/check",
            post(responses_handler::<R, G>),
        )
        .with_state(service)
}

pub(crate) async fn check_handler<R, G>(
    State(service): State<Arc<CriteriaService<R, G>>>,
    axum::Json(tender): axum::Json<TenderPayload>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    match service.check(&tender) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, G>(
    State(service): State<Arc<CriteriaService<R, G>>>,
    Path(process_id): Path<String>,
    axum::Json(tender): axum::Json<TenderPayload>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    match service.create(&ProcessId(process_id), &tender) {
        Ok(tree) => (StatusCode::CREATED, axum::Json(tree)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<R, G>(
    State(service): State<Arc<CriteriaService<R, G>>>,
    Path(process_id): Path<String>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    match service.snapshot(&ProcessId(process_id)) {
        Ok(tree) => (StatusCode::OK, axum::Json(tree)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn responses_handler<R, G>(
    State(service): State<Arc<CriteriaService<R, G>>>,
    Path(process_id): Path<String>,
    axum::Json(bid): axum::Json<BidPayload>,
) -> Response
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    match service.check_responses(&ProcessId(process_id), &bid) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: CriteriaServiceError) -> Response {
    match error {
        CriteriaServiceError::Validation(error) => {
            (StatusCode::BAD_REQUEST, axum::Json(error.view())).into_response()
        }
        CriteriaServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "criteria not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        CriteriaServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "criteria already exist for this process" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
