use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use vital_trends_domain::TrendsConfig;

use crate::api::handlers::{health, vital_trends};
use crate::openapi::configure_swagger_routes;

/// Create the application router with the default service
pub fn create_app(config: &TrendsConfig) -> Router {
    debug!("Creating application router");

    // Create vital trends service using factory function
    let service = vital_trends::create_service(config);

    create_app_with_service(service)
}

/// Create the application router around an existing service
pub fn create_app_with_service(service: vital_trends::VitalTrendsService) -> Router {
    // Set up API routes
    let api_routes = Router::new()
        .route("/vitals/overview", post(vital_trends::get_weekly_overview))
        .route("/vitals/weekly-averages", post(vital_trends::get_weekly_averages))
        .route("/vitals/highest-by-day", post(vital_trends::get_highest_by_day));

    debug!("API routes configured");

    // Set up public routes
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Combine all routes
    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(service);

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Get Swagger UI routes
    let swagger = configure_swagger_routes();

    // Merge Swagger UI with the app router
    app.merge(swagger)
}
