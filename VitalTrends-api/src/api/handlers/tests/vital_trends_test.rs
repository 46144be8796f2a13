use std::sync::{Arc, Once};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::FixedOffset;
use serde_json::{json, Value};
use tower::ServiceExt;

use vital_trends_domain::services::VitalTrendsService;
use vital_trends_domain::testing::{millis_at, FixedClock};
use vital_trends_domain::TrendsConfig;

use crate::api::routes::create_app_with_service;
use crate::entities::common::ErrorResponse;
use crate::entities::vital_signs::{
    HighestByDayResponse, WeeklyAveragesResponse, WeeklyOverviewResponse,
};

static INIT: Once = Once::new();

fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Router around a UTC service frozen at noon on Wednesday 2024-03-06
pub(crate) fn create_test_app() -> Router {
    init_test_logging();

    let config = TrendsConfig {
        utc_offset: FixedOffset::east_opt(0).unwrap(),
        ..TrendsConfig::default()
    };
    let service = VitalTrendsService::new(&config, FixedClock::at_noon(2024, 3, 6));

    create_app_with_service(Arc::new(service))
}

async fn post_json(uri: &str, payload: Value) -> (StatusCode, Vec<u8>) {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn blood_pressure_readings() -> Value {
    json!([
        { "timestamp": millis_at(2024, 3, 4, 8, 0), "diastolicBloodPressure": 80, "systolicBloodPressure": 120 },
        { "timestamp": millis_at(2024, 3, 4, 20, 0), "diastolicBloodPressure": 85, "systolicBloodPressure": 118 },
        { "timestamp": millis_at(2024, 3, 6, 9, 30).to_string(), "diastolicBloodPressure": 90, "systolicBloodPressure": 130 },
        { "timestamp": millis_at(2024, 2, 27, 7, 0), "diastolicBloodPressure": 75, "systolicBloodPressure": 125 }
    ])
}

#[tokio::test]
async fn test_weekly_overview_current_week() {
    let (status, body) = post_json(
        "/api/v1/vitals/overview",
        json!({ "readings": blood_pressure_readings() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let overview: WeeklyOverviewResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(overview.offset, 0);
    assert!(overview.is_initial);
    assert_eq!(overview.week_dates.first().map(String::as_str), Some("2024-03-03"));
    assert_eq!(overview.week_dates.last().map(String::as_str), Some("2024-03-09"));
    assert_eq!(
        overview.categories,
        vec!["Sun 3", "Mon 4", "Tue 5", "Wed 6", "Thu 7", "Fri 8", "Sat 9"]
    );
    assert_eq!(overview.scope_label, "March");

    assert_eq!(overview.series.len(), 2);
    assert_eq!(overview.series[0].name, "Highest Diastolic Blood Pressure");
    assert_eq!(overview.series[0].data, vec![0.0, 85.0, 0.0, 90.0, 0.0, 0.0, 0.0]);
    assert_eq!(overview.series[1].name, "Highest Systolic Blood Pressure");
    assert_eq!(overview.series[1].data, vec![0.0, 120.0, 0.0, 130.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_weekly_overview_navigates_back() {
    let (status, body) = post_json(
        "/api/v1/vitals/overview",
        json!({
            "readings": blood_pressure_readings(),
            "navigation": "prev",
            "fields": ["diastolicBloodPressure"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let overview: WeeklyOverviewResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(overview.offset, -1);
    assert!(!overview.is_initial);
    assert_eq!(overview.week_dates[0], "2024-02-25");
    assert_eq!(overview.scope_label, "February – March");
    assert_eq!(overview.series.len(), 1);
    assert_eq!(overview.series[0].data, vec![0.0, 0.0, 75.0, 0.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_weekly_overview_next_stops_at_current_week() {
    let (status, body) = post_json(
        "/api/v1/vitals/overview",
        json!({ "readings": [], "offset": 0, "navigation": "next" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let overview: WeeklyOverviewResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(overview.offset, 0);
    assert!(overview.is_initial);
    assert!(overview.series.iter().all(|series| series.data.iter().all(|v| *v == 0.0)));
}

#[tokio::test]
async fn test_weekly_overview_rejects_future_offset() {
    let (status, body) = post_json(
        "/api/v1/vitals/overview",
        json!({ "readings": [], "offset": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "validation_error");
}

#[tokio::test]
async fn test_weekly_overview_rejects_malformed_timestamp() {
    let (status, body) = post_json(
        "/api/v1/vitals/overview",
        json!({
            "readings": [
                { "timestamp": millis_at(2024, 3, 4, 8, 0), "diastolicBloodPressure": 80 },
                { "timestamp": "yesterday", "diastolicBloodPressure": 82 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "bad_request");
    assert_eq!(error.details, Some(json!({ "reading": 1 })));
}

#[tokio::test]
async fn test_weekly_averages_divides_by_full_week() {
    let (status, body) = post_json(
        "/api/v1/vitals/weekly-averages",
        json!({
            "readings": [
                { "timestamp": millis_at(2024, 3, 4, 8, 0), "diastolicBloodPressure": 70 },
                { "timestamp": millis_at(2024, 3, 4, 21, 0), "diastolicBloodPressure": 99 },
                { "timestamp": millis_at(2024, 3, 5, 8, 0), "diastolicBloodPressure": 77 },
                { "timestamp": millis_at(2024, 2, 26, 8, 0), "diastolicBloodPressure": 70 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: WeeklyAveragesResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(response.weeks_back, 1);
    assert_eq!(response.weeks.len(), 2);

    let previous = &response.weeks[0];
    assert_eq!(previous.week_start, "2024-02-25");
    assert_eq!(previous.populated_days, 1);
    assert_eq!(previous.averages["diastolicBloodPressure"], Some(10.0));

    // First reading of each day is used: (70 + 77) / 7
    let current = &response.weeks[1];
    assert_eq!(current.week_start, "2024-03-03");
    assert_eq!(current.populated_days, 2);
    assert_eq!(current.averages["diastolicBloodPressure"], Some(21.0));
}

#[tokio::test]
async fn test_weekly_averages_missing_field_is_null() {
    let (status, body) = post_json(
        "/api/v1/vitals/weekly-averages",
        json!({
            "readings": [
                { "timestamp": millis_at(2024, 3, 4, 8, 0), "heartRate": 64 },
                { "timestamp": millis_at(2024, 3, 5, 8, 0), "diastolicBloodPressure": 77, "heartRate": 71 }
            ],
            "weeksBack": 0,
            "fields": ["diastolicBloodPressure", "heartRate"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: WeeklyAveragesResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(response.weeks.len(), 1);
    let week = &response.weeks[0];
    assert_eq!(week.averages["diastolicBloodPressure"], None);
    assert_eq!(week.averages["heartRate"], Some(135.0 / 7.0));
}

#[tokio::test]
async fn test_weekly_averages_rejects_too_many_weeks() {
    let (status, body) = post_json(
        "/api/v1/vitals/weekly-averages",
        json!({ "readings": [], "weeksBack": 500 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "validation_error");
}

#[tokio::test]
async fn test_highest_by_day_keeps_maximum() {
    let (status, body) = post_json(
        "/api/v1/vitals/highest-by-day",
        json!({
            "readings": [
                { "timestamp": millis_at(2024, 3, 4, 8, 0), "heartRate": 70 },
                { "timestamp": millis_at(2024, 3, 4, 20, 0), "heartRate": 82 },
                { "timestamp": millis_at(2024, 3, 4, 22, 0), "heartRate": 76 },
                { "timestamp": millis_at(2024, 3, 5, 8, 0) }
            ],
            "field": "heartRate"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: HighestByDayResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(response.days.len(), 1);
    assert_eq!(response.days["2024-03-04"], 82.0);
}

#[tokio::test]
async fn test_highest_by_day_rejects_unknown_field() {
    let (status, body) = post_json(
        "/api/v1/vitals/highest-by-day",
        json!({ "readings": [], "field": "pulse" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "bad_request");
}
