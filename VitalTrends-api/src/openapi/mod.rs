use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vital trends endpoints
        crate::api::handlers::vital_trends::get_weekly_overview,
        crate::api::handlers::vital_trends::get_weekly_averages,
        crate::api::handlers::vital_trends::get_highest_by_day,
    ),
    components(
        schemas(
            // Entities
            crate::entities::vital_signs::PublicVitalSignsReading,
            crate::entities::vital_signs::WeeklyOverviewRequest,
            crate::entities::vital_signs::WeeklyOverviewResponse,
            crate::entities::vital_signs::PublicChartSeries,
            crate::entities::vital_signs::WeeklyAveragesRequest,
            crate::entities::vital_signs::WeeklyAveragesResponse,
            crate::entities::vital_signs::PublicWeeklyAverage,
            crate::entities::vital_signs::HighestByDayRequest,
            crate::entities::vital_signs::HighestByDayResponse,
            crate::entities::common::ErrorResponse,

            // Domain enums
            vital_trends_domain::VitalSign,
            vital_trends_domain::services::Navigation,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vital_trends", description = "Weekly vital-sign aggregation endpoints")
    ),
    info(
        title = "VitalTrends API",
        version = "0.1.0",
        description = "API for aggregating vital-sign readings into weekly trends",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
