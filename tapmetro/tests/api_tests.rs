//! Integration tests for the tapmetro HTTP API
//!
//! Tests cover:
//! - GET/PUT /bpm
//! - GET/DELETE /bpm/list
//! - GET/DELETE /bpm/min and /bpm/max
//! - Response headers (JSON content type, permissive CORS)
//! - Indicator recompute after mutating requests

use axum::body::Body;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tapmetro::api::{create_router, AppState};
use tapmetro::tempo::{SampleHistory, TempoStore};
use tapmetro::TempoController;
use tapmetro_common::events::EventBus;
use tower::util::ServiceExt; // for `oneshot` method

const SUCCESS: &str = "your request has been processed successfully!";

/// Test helper: Controller seeded with the given history
fn controller_with(slots: [u32; 4]) -> TempoController {
    TempoController::with_store(
        TempoStore::with_history(SampleHistory::from_slots(slots)),
        EventBus::new(64),
    )
}

/// Test helper: Send one request, return status, headers and JSON body
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, http::HeaderMap, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            request.body(Body::from(json_body.to_string())).unwrap()
        }
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, headers, json)
}

/// Test helper: Send a raw (non-JSON-value) body
async fn send_raw(app: &axum::Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// GET/PUT /bpm
// =============================================================================

#[tokio::test]
async fn test_get_bpm_on_fresh_start_is_zero() {
    let app = create_router(AppState::new(TempoController::new(EventBus::new(8))));

    let (status, headers, body) = send(&app, "GET", "/bpm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "bpm": 0 }));
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_put_bpm_appends_and_updates_indicator() {
    let controller = controller_with([60, 70, 80, 90]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, headers, body) = send(&app, "PUT", "/bpm", Some(json!({ "bpm": 120 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": SUCCESS }));
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let (_, _, body) = send(&app, "GET", "/bpm", None).await;
    assert_eq!(body, json!({ "bpm": 120 }));
    let (_, _, body) = send(&app, "GET", "/bpm/list", None).await;
    assert_eq!(body, json!({ "bpm_list": [70, 80, 90, 120] }));

    let signal = controller.signal();
    assert_eq!(signal.bpm, 120);
    assert_eq!(signal.interval_ms, Some(500));
}

#[tokio::test]
async fn test_put_bpm_rejects_malformed_bodies() {
    let controller = controller_with([0, 0, 0, 100]);
    let app = create_router(AppState::new(controller.clone()));
    let bad_request = json!({ "msg": "Bad Request" });

    for body in [
        json!({}),
        json!({ "bpm": "fast" }),
        json!({ "bpm": -5 }),
        json!({ "bpm": 12.5 }),
        json!({ "tempo": 120 }),
    ] {
        let (status, _, response) = send(&app, "PUT", "/bpm", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response, bad_request);
    }

    let (status, response) = send_raw(&app, "PUT", "/bpm", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, bad_request);

    // Missing body and content type
    let (status, headers, response) = send(&app, "PUT", "/bpm", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, bad_request);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    assert_eq!(controller.list_samples().unwrap(), [0, 0, 0, 100]);
}

// =============================================================================
// GET/DELETE /bpm/list
// =============================================================================

#[tokio::test]
async fn test_list_includes_sentinel_zeros() {
    let app = create_router(AppState::new(controller_with([0, 0, 95, 110])));

    let (status, _, body) = send(&app, "GET", "/bpm/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "bpm_list": [0, 0, 95, 110] }));
}

#[tokio::test]
async fn test_delete_by_value_clears_first_match() {
    let controller = controller_with([100, 120, 100, 90]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, _, body) = send(&app, "DELETE", "/bpm/list", Some(json!({ "bpm": 100 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": SUCCESS }));
    assert_eq!(controller.list_samples().unwrap(), [0, 120, 100, 90]);
}

#[tokio::test]
async fn test_delete_tail_value_stops_blinking() {
    let controller = controller_with([0, 0, 100, 120]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, _, _) = send(&app, "DELETE", "/bpm/list", Some(json!({ "bpm": 120 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = send(&app, "GET", "/bpm", None).await;
    assert_eq!(body, json!({ "bpm": 0 }));
    assert!(!controller.signal().is_active());
}

#[tokio::test]
async fn test_delete_zero_is_noop_success() {
    let controller = controller_with([0, 120, 0, 90]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, _, body) = send(&app, "DELETE", "/bpm/list", Some(json!({ "bpm": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": SUCCESS }));
    assert_eq!(controller.list_samples().unwrap(), [0, 120, 0, 90]);
}

#[tokio::test]
async fn test_delete_missing_value_is_bad_request() {
    let controller = controller_with([100, 120, 100, 90]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, headers, body) =
        send(&app, "DELETE", "/bpm/list", Some(json!({ "bpm": 77 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Bad Request, please check the bpm value" }));
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(controller.list_samples().unwrap(), [100, 120, 100, 90]);
}

#[tokio::test]
async fn test_delete_with_malformed_body_is_bad_request() {
    let app = create_router(AppState::new(controller_with([100, 120, 100, 90])));

    let (status, _, body) = send(&app, "DELETE", "/bpm/list", Some(json!({ "value": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Bad Request, please check the bpm value" }));
}

// =============================================================================
// GET/DELETE /bpm/min, /bpm/max
// =============================================================================

#[tokio::test]
async fn test_min_counts_sentinel_zero() {
    let controller = controller_with([120, 0, 140, 100]);
    let app = create_router(AppState::new(controller.clone()));

    let (status, _, body) = send(&app, "GET", "/bpm/min", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "bpm": 0 }));

    let (status, _, body) = send(&app, "DELETE", "/bpm/min", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": SUCCESS }));
    assert_eq!(controller.list_samples().unwrap(), [120, 0, 140, 100]);
}

#[tokio::test]
async fn test_delete_min_on_full_history_clears_all_duplicates() {
    let controller = controller_with([90, 120, 90, 140]);
    let app = create_router(AppState::new(controller.clone()));

    let (_, _, body) = send(&app, "GET", "/bpm/min", None).await;
    assert_eq!(body, json!({ "bpm": 90 }));

    let (status, _, _) = send(&app, "DELETE", "/bpm/min", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(controller.list_samples().unwrap(), [0, 120, 0, 140]);
}

#[tokio::test]
async fn test_delete_max_recomputes_indicator() {
    let controller = controller_with([90, 100, 110, 150]);
    let app = create_router(AppState::new(controller.clone()));

    let (_, _, body) = send(&app, "GET", "/bpm/max", None).await;
    assert_eq!(body, json!({ "bpm": 150 }));

    let (status, headers, _) = send(&app, "DELETE", "/bpm/max", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(controller.list_samples().unwrap(), [90, 100, 110, 0]);
    assert_eq!(controller.signal().interval_ms, None);
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(AppState::new(TempoController::new(EventBus::new(8))));

    let (status, _, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "tapmetro");
    assert_eq!(body["learning"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = create_router(AppState::new(TempoController::new(EventBus::new(8))));

    let (status, _, body) = send(&app, "GET", "/build_info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}
