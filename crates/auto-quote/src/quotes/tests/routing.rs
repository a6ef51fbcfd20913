use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::quotes::repository::InMemoryQuoteRepository;
use crate::quotes::router::submit_handler;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn memory_router() -> Router {
    router_with(Arc::new(InMemoryQuoteRepository::new()))
}

fn ids(payload: &Value) -> Vec<&str> {
    payload
        .as_array()
        .expect("array payload")
        .iter()
        .filter_map(|entry| entry.get("id").and_then(Value::as_str))
        .collect()
}

#[tokio::test]
async fn submit_handler_returns_unavailable_on_store_failure() {
    let service = Arc::new(service_with(Arc::new(UnavailableRepository)));

    let response =
        submit_handler::<UnavailableRepository>(State(service), axum::Json(quote_data())).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(service_with(Arc::new(ConflictRepository)));

    let response =
        submit_handler::<ConflictRepository>(State(service), axum::Json(quote_data())).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn quote_lifecycle_over_http() {
    let router = memory_router();
    let payload = serde_json::to_value(quote_data()).expect("serializes");

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/quotes", payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    let id = created["id"].as_str().expect("id present").to_string();
    assert_eq!(created["quote"], json!(QUOTE_DATA_PREMIUM));
    assert_eq!(created["data"]["vehicleModel"], json!("cr-v"));

    let response = router
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/quotes/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, created);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/quotes"))
        .await
        .expect("route executes");
    assert_eq!(ids(&read_json_body(response).await), vec![id.as_str()]);

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/v1/quotes/{id}")))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = router
        .oneshot(empty_request("GET", &format!("/api/v1/quotes/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_submission_is_unprocessable() {
    let mut data = quote_data();
    data.applicant.zip = "ABCDE".to_string();
    let payload = serde_json::to_value(data).expect("serializes");

    let response = memory_router()
        .oneshot(json_request("POST", "/api/v1/quotes", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("zip"));
}

#[tokio::test]
async fn estimate_returns_breakdown() {
    let payload = serde_json::to_value(quote_data()).expect("serializes");

    let response = memory_router()
        .oneshot(json_request("POST", "/api/v1/quotes/estimate", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["premium"], json!(QUOTE_DATA_PREMIUM));
    assert_eq!(body["adjustments"][0]["factor"], json!("base"));
    assert_eq!(body["adjustments"][3]["factor"], json!("vehicle_type"));
}

#[tokio::test]
async fn catalog_endpoints_filter_by_type_and_make() {
    let router = memory_router();

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/catalog/types"))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(response).await.as_array().map(Vec::len), Some(9));

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/catalog/makes?type=truck"))
        .await
        .expect("route executes");
    let makes = read_json_body(response).await;
    assert_eq!(ids(&makes), vec!["chevrolet", "ford", "toyota"]);

    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/catalog/models?make=toyota&type=sedan",
        ))
        .await
        .expect("route executes");
    assert_eq!(
        ids(&read_json_body(response).await),
        vec!["camry", "corolla"]
    );

    let response = router
        .oneshot(empty_request(
            "GET",
            "/api/v1/catalog/models?make=delorean&type=sedan",
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ids(&read_json_body(response).await).is_empty());
}

#[tokio::test]
async fn selection_change_reports_invalidated_fields() {
    let body = json!({
        "current": {
            "vehicleType": "sedan",
            "vehicleMake": "honda",
            "vehicleModel": "accord"
        },
        "field": "vehicleType",
        "value": "truck"
    });

    let response = memory_router()
        .oneshot(json_request("POST", "/api/v1/catalog/selection", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["state"]["vehicleType"], json!("truck"));
    assert_eq!(payload["state"]["vehicleMake"], Value::Null);
    assert_eq!(
        payload["invalidated"],
        json!(["vehicleMake", "vehicleModel"])
    );
    assert_eq!(ids(&payload["makes"]), vec!["chevrolet", "ford", "toyota"]);
    assert!(ids(&payload["models"]).is_empty());
}
