use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use validator::ValidationErrors;

use vital_trends_domain::VitalTrendsError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self::validation_error("Request validation failed", details)
    }
}

impl From<VitalTrendsError> for ErrorResponse {
    fn from(error: VitalTrendsError) -> Self {
        warn!("Rejecting request: {}", error);
        match error {
            VitalTrendsError::MalformedTimestamp { index, .. } => Self {
                error: "bad_request".to_string(),
                message: error.to_string(),
                details: Some(serde_json::json!({ "reading": index })),
            },
            VitalTrendsError::MissingField { .. }
            | VitalTrendsError::UnknownField(_)
            | VitalTrendsError::WindowOutOfRange { .. } => Self::bad_request(&error.to_string()),
            VitalTrendsError::InvalidRequest(_) => Self::validation_error(&error.to_string(), None),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}
