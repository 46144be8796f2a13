use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated, epoch seconds
    pub timestamp: i64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
    /// Environment information
    pub environment: String,
}

// Track the time when the server started
static SERVER_START_TIME: OnceCell<i64> = OnceCell::new();

/// Record the server start time; later calls keep the first value
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.set(Utc::now().timestamp());
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument]
pub async fn health_check() -> impl IntoResponse {
    info!("Health check requested");

    let now = Utc::now().timestamp();
    let uptime = SERVER_START_TIME
        .get()
        .map(|&start_time| (now - start_time).max(0));

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    (StatusCode::OK, Json(response))
}
