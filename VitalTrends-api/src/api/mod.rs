pub mod handlers;
pub mod routes;

use axum::Router;
use vital_trends_domain::TrendsConfig;

/// Create the application router
pub fn create_application(config: &TrendsConfig) -> Router {
    routes::create_app(config)
}
