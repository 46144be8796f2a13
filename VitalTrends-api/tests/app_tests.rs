use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use vital_trends_api::api::create_application;
use vital_trends_domain::TrendsConfig;

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

// Helper function to get body bytes from a response
async fn get_body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_app_creation_and_health_check() {
    initialize();

    let app = create_application(&TrendsConfig::default());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_overview_with_system_clock() {
    initialize();

    let app = create_application(&TrendsConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/vitals/overview")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "readings": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;

    assert_eq!(body["offset"], 0);
    assert_eq!(body["isInitial"], true);
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["weekDates"].as_array().map(Vec::len), Some(7));
    assert!(body["categories"][0].as_str().unwrap().starts_with("Sun "));
    assert_eq!(body["series"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    initialize();

    let app = create_application(&TrendsConfig::default());

    let response = app
        .oneshot(Request::builder().uri("/api/v1/vitals/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
