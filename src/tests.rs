use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::models::ErrorResponse;

fn test_app() -> Router {
    let config = Config {
        bind_addr: config::DEFAULT_BIND_ADDR.parse().unwrap(),
        cors_allowed_origins: "*".to_string(),
    };
    build_router(AppState::new(), &config)
}

async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post_raw(body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/calculate-calories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(request).await
}

async fn post_workout(body: Value) -> (StatusCode, Vec<u8>) {
    post_raw(&body.to_string()).await
}

async fn estimate(body: Value) -> CalorieResponse {
    let (status, bytes) = post_workout(body).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_banner() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().starts_with("Calorie Estimator API"));
}

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["timestamp"].is_string());
    assert!(health["uptime_seconds"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_running_one_hour() {
    let result = estimate(json!({
        "exercise": "running",
        "duration": 60,
        "intensity": "moderate",
        "date": "2026-10-18"
    }))
    .await;

    assert_eq!(result.calories, 560);
    assert!(result
        .explanation
        .starts_with("Based on 60 minutes of Running at moderate intensity"));
}

#[tokio::test]
async fn test_non_string_date_is_ignored() {
    let result = estimate(json!({
        "exercise": "running",
        "duration": 60,
        "intensity": "moderate",
        "date": 20261018
    }))
    .await;

    assert_eq!(result.calories, 560);
}

#[tokio::test]
async fn test_duration_echoed_as_sent() {
    let result = estimate(json!({
        "exercise": "running",
        "duration": "030",
        "intensity": "moderate"
    }))
    .await;

    assert_eq!(result.calories, 280);
    assert!(result.explanation.starts_with("Based on 030 minutes of Running"));
}

#[tokio::test]
async fn test_running_half_hour_vigorous() {
    let result = estimate(json!({
        "exercise": "Running",
        "duration": 30,
        "intensity": "vigorous"
    }))
    .await;

    assert_eq!(result.calories, 336);
    assert!(result.explanation.contains("adjusted by a 1.2x intensity multiplier to 9.6 METs"));
    assert!(result
        .explanation
        .contains("The high intensity level significantly increases calorie burn."));
}

#[tokio::test]
async fn test_unknown_exercise_uses_general_profile() {
    let result = estimate(json!({
        "exercise": "xyzzy-not-an-exercise",
        "duration": 60,
        "intensity": "moderate"
    }))
    .await;

    // 3.5 * 70 * 1
    assert_eq!(result.calories, 245);
    assert!(result.explanation.contains("of General Exercise at"));
}

#[tokio::test]
async fn test_unknown_intensity_defaults() {
    let result = estimate(json!({
        "exercise": "jumping rope",
        "duration": 10,
        "intensity": "unknown-label"
    }))
    .await;

    assert_eq!(result.calories, 140);
    assert!(result.explanation.contains("1x intensity multiplier"));
}

#[tokio::test]
async fn test_numeric_string_duration() {
    let result = estimate(json!({
        "exercise": "cycling",
        "duration": "30",
        "intensity": "light"
    }))
    .await;

    // 6.0 * 0.8 * 70 * 0.5
    assert_eq!(result.calories, 168);
    assert!(result.explanation.contains("the calorie burn is conservative"));
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let cases = [
        json!({ "duration": 30, "intensity": "moderate" }),
        json!({ "exercise": "", "duration": 30, "intensity": "moderate" }),
        json!({ "exercise": "running", "duration": 0, "intensity": "moderate" }),
        json!({ "exercise": "running", "duration": null, "intensity": "moderate" }),
        json!({ "exercise": "running", "duration": 30, "intensity": "" }),
        json!({}),
    ];

    for body in cases {
        let (status, bytes) = post_workout(body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");

        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.error, "Missing required fields");
    }
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let (status, bytes) = post_raw("{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(error.error.starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_malformed_duration_falls_back() {
    let (status, bytes) = post_workout(json!({
        "exercise": "running",
        "duration": "abc",
        "intensity": "moderate"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let result: CalorieResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result.calories, 0);
    assert_eq!(
        result.explanation,
        "Due to a technical issue, I'm providing a basic estimate: approximately 0 calories burned \
         during abc minutes of running at moderate intensity. This is a conservative estimate \
         based on general fitness guidelines."
    );
}

#[tokio::test]
async fn test_non_text_exercise_falls_back() {
    let result = estimate(json!({
        "exercise": 42,
        "duration": 20,
        "intensity": "vigorous"
    }))
    .await;

    // Flat 5 calories per minute
    assert_eq!(result.calories, 100);
    assert!(result
        .explanation
        .contains("approximately 100 calories burned during 20 minutes of 42 at vigorous intensity"));
}

#[tokio::test]
async fn test_non_finite_duration_falls_back() {
    let result = estimate(json!({
        "exercise": "swimming",
        "duration": "NaN",
        "intensity": "moderate"
    }))
    .await;

    assert_eq!(result.calories, 0);
    assert!(result.explanation.starts_with("Due to a technical issue"));
}

#[tokio::test]
async fn test_repeated_requests_match() {
    let body = json!({
        "exercise": "Mountain Climbers",
        "duration": 17,
        "intensity": "very-vigorous"
    });

    let first = estimate(body.clone()).await;
    let second = estimate(body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_exercises() {
    let request = Request::builder()
        .uri("/api/exercises")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let catalog: Value = serde_json::from_slice(&body).unwrap();

    let exercises = catalog["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), CATALOG.len());
    assert_eq!(exercises[0]["key"], "running");
    assert_eq!(exercises[0]["display_name"], "Running");
    assert_eq!(exercises[0]["met"], 8.0);

    let labels: Vec<&str> = catalog["intensities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["light", "moderate", "vigorous", "very-vigorous"]);
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/calculate-calories")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
