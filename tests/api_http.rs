// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /predict (ranked results + sentinel shapes)
// - GET /debug/similarity
// - GET /admin/reload-assets

use axum::{
    body::{self, Body},
    http::Request,
    Router,
};
use http::StatusCode;
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use symptom_triage_engine::api;
use symptom_triage_engine::config::{EngineConfig, Tuning};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses; no asset bundle on disk means the
/// built-in seed backs the engine.
fn test_router() -> Router {
    let config = EngineConfig {
        asset_dir: "assets".into(),
        tuning: Tuning::default(),
    };
    let state = api::AppState::from_config(config).expect("state from seed assets");
    api::create_router(state)
}

async fn post_predict(app: Router, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /predict");

    let resp = app.oneshot(req).await.expect("oneshot /predict");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse predict json");
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "ok", "health body should be 'ok'");
}

#[tokio::test]
async fn api_predict_returns_ranked_results_with_contract_fields() {
    let app = test_router();

    let (status, v) = post_predict(app, json!({ "symptoms": ["cough", "runny nose"] })).await;
    assert!(status.is_success(), "POST /predict should be 2xx, got {status}");

    let arr = v.as_array().expect("predict response must be an array");
    assert!(!arr.is_empty() && arr.len() <= 5);

    // Contract checks for UI consumers.
    let top = &arr[0];
    assert_eq!(top["disease"], "Common Cold");
    assert!(top.get("score").is_some(), "missing 'score'");
    assert!(top.get("confidence").is_some(), "missing 'confidence'");
    assert!(top.get("description").is_some(), "missing 'description'");
    assert!(top["precautions"].is_array(), "missing 'precautions'");
    assert!(
        top["matched_symptoms"].is_array(),
        "missing 'matched_symptoms'"
    );
    assert!(top.get("error").is_none(), "ranked rows carry no 'error'");
}

#[tokio::test]
async fn api_predict_empty_input_yields_sentinel() {
    let app = test_router();

    let (status, v) = post_predict(app, json!({ "symptoms": [] })).await;
    assert!(status.is_success());

    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 1, "sentinel must be a one-element sequence");
    assert!(arr[0].get("error").is_some(), "sentinel carries 'error'");
    assert!(arr[0].get("disease").is_none(), "sentinel has no 'disease'");
}

#[tokio::test]
async fn api_predict_normalizes_messy_input() {
    let app = test_router();

    let (_, v) = post_predict(app, json!({ "symptoms": ["  COUGH ", "Runny Nose"] })).await;
    let arr = v.as_array().expect("array");
    assert_eq!(arr[0]["disease"], "Common Cold");
}

#[tokio::test]
async fn api_debug_similarity_reports_ratio() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/debug/similarity?a=cough&b=cough")
        .body(Body::empty())
        .expect("build GET /debug/similarity");

    let resp = app.oneshot(req).await.expect("oneshot /debug/similarity");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert!(body.contains("1.000"), "identical strings score 1.000: {body}");
}

#[tokio::test]
async fn api_admin_reload_keeps_serving() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/admin/reload-assets")
        .body(Body::empty())
        .expect("build GET /admin/reload-assets");

    let resp = app.clone().oneshot(req).await.expect("oneshot reload");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).unwrap(), "reloaded");

    // The swapped snapshot must keep answering.
    let (status, v) = post_predict(app, json!({ "symptoms": ["fever"] })).await;
    assert!(status.is_success());
    assert!(!v.as_array().unwrap().is_empty());
}
