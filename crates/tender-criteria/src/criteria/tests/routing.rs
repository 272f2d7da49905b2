use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::criteria::router::{criteria_router, responses_handler, snapshot_handler};
use crate::criteria::service::CriteriaService;

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialise payload")))
        .expect("request builds")
}

fn tender_json() -> Value {
    serde_json::to_value(tender()).expect("tender serialises")
}

#[tokio::test]
async fn check_route_accepts_valid_tender() {
    let router = criteria_router(build_service());

    let response = router
        .oneshot(json_request("POST", "/api/v1/criteria/check", &tender_json()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn check_route_reports_validation_code() {
    let mut tender = tender();
    conversion_mut(&mut tender, "conv-iso").related_item = "req-warranty".to_string();
    let payload = serde_json::to_value(tender).expect("tender serialises");

    let response = criteria_router(build_service())
        .oneshot(json_request("POST", "/api/v1/criteria/check", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "invalid_conversion");
    assert!(body["description"]
        .as_str()
        .is_some_and(|text| text.contains("req-warranty")));
}

#[tokio::test]
async fn malformed_tender_is_rejected_before_checks() {
    let payload = json!({ "awardCriteria": "lowestBid", "mainProcurementCategory": "goods" });

    let response = criteria_router(build_service())
        .oneshot(json_request("POST", "/api/v1/criteria/check", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn created_criteria_can_be_read_back() {
    let router = criteria_router(build_service());
    let uri = format!("/api/v1/processes/{}/criteria", process_id());

    let created = router
        .clone()
        .oneshot(json_request("POST", &uri, &tender_json()))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = read_json_body(created).await;
    assert_eq!(created["awardCriteriaDetails"], "automated");
    assert_eq!(created["conversions"][0]["relatedItem"], "requirement-1");

    let fetched = router
        .oneshot(
            Request::get(&uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(read_json_body(fetched).await, created);
}

#[tokio::test]
async fn creating_twice_conflicts() {
    let router = criteria_router(build_service());
    let uri = format!("/api/v1/processes/{}/criteria", process_id());

    let first = router
        .clone()
        .oneshot(json_request("POST", &uri, &tender_json()))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(json_request("POST", &uri, &tender_json()))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn snapshot_handler_returns_not_found_for_unknown_process() {
    let response = snapshot_handler::<MemoryRepository, SequenceIds>(
        State(build_service()),
        Path("missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(CriteriaService::new(
        Arc::new(UnavailableRepository),
        Arc::new(SequenceIds::default()),
    ));

    let response = responses_handler::<UnavailableRepository, SequenceIds>(
        State(service),
        Path(process_id().to_string()),
        axum::Json(bid()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn responses_route_reports_incomplete_bid() {
    let router = criteria_router(build_service());
    let criteria_uri = format!("/api/v1/processes/{}/criteria", process_id());
    let responses_uri = format!("/api/v1/processes/{}/responses/check", process_id());

    let created = router
        .clone()
        .oneshot(json_request("POST", &criteria_uri, &tender_json()))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);

    let empty_bid = json!({ "relatedLots": ["lot-1"], "requirementResponses": [] });
    let response = router
        .oneshot(json_request("POST", &responses_uri, &empty_bid))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "invalid_requirement_value");
}
