use std::sync::Arc;

use axum::extract::{Json, State};
use tracing::{info, instrument};
use validator::Validate;

// Import domain services
use vital_trends_domain::services::{
    create_default_vital_trends_service, VitalTrendsServiceTrait, WeekWindow,
};
use vital_trends_domain::{TrendsConfig, VitalSign};

// Import our entities
use crate::entities::common::ErrorResponse;
use crate::entities::vital_signs::{
    convert_to_domain_readings, parse_fields, HighestByDayRequest, HighestByDayResponse,
    PublicWeeklyAverage, WeeklyAveragesRequest, WeeklyAveragesResponse, WeeklyOverviewRequest,
    WeeklyOverviewResponse,
};

/// Fields charted when an overview request names none
pub const DEFAULT_OVERVIEW_FIELDS: [VitalSign; 2] = [
    VitalSign::DiastolicBloodPressure,
    VitalSign::SystolicBloodPressure,
];

/// Fields averaged when an averages request names none
pub const DEFAULT_AVERAGE_FIELDS: [VitalSign; 1] = [VitalSign::DiastolicBloodPressure];

/// Service type for dependency injection
pub type VitalTrendsService = Arc<dyn VitalTrendsServiceTrait + Send + Sync>;

/// Create a default service for the handlers to use
pub fn create_service(config: &TrendsConfig) -> VitalTrendsService {
    Arc::new(create_default_vital_trends_service(config))
}

/// Build the weekly chart for a window, optionally navigating first
#[utoipa::path(
    post,
    path = "/api/v1/vitals/overview",
    request_body = WeeklyOverviewRequest,
    responses(
        (status = 200, description = "Weekly chart payload", body = WeeklyOverviewResponse),
        (status = 400, description = "Invalid request or reading", body = ErrorResponse),
    ),
    tag = "vital_trends"
)]
#[instrument(skip(service, request), fields(readings = request.readings.len(), offset = request.offset))]
pub async fn get_weekly_overview(
    State(service): State<VitalTrendsService>,
    Json(request): Json<WeeklyOverviewRequest>,
) -> Result<Json<WeeklyOverviewResponse>, ErrorResponse> {
    request.validate()?;

    let fields = parse_fields(request.fields.as_deref(), &DEFAULT_OVERVIEW_FIELDS)?;

    let mut window = WeekWindow::at(request.offset);
    if let Some(navigation) = request.navigation {
        window.apply(navigation);
    }

    let readings = convert_to_domain_readings(request.readings);
    let overview = service.weekly_overview(&readings, &window, &fields)?;

    info!(offset = overview.offset, series = overview.series.len(), "Weekly overview built");
    Ok(Json(WeeklyOverviewResponse::from(overview)))
}

/// Average fields over the current week and trailing weeks
#[utoipa::path(
    post,
    path = "/api/v1/vitals/weekly-averages",
    request_body = WeeklyAveragesRequest,
    responses(
        (status = 200, description = "Weekly averages, oldest week first", body = WeeklyAveragesResponse),
        (status = 400, description = "Invalid request or reading", body = ErrorResponse),
    ),
    tag = "vital_trends"
)]
#[instrument(skip(service, request), fields(readings = request.readings.len(), weeks_back = request.weeks_back))]
pub async fn get_weekly_averages(
    State(service): State<VitalTrendsService>,
    Json(request): Json<WeeklyAveragesRequest>,
) -> Result<Json<WeeklyAveragesResponse>, ErrorResponse> {
    request.validate()?;

    let fields = parse_fields(request.fields.as_deref(), &DEFAULT_AVERAGE_FIELDS)?;
    let readings = convert_to_domain_readings(request.readings);
    let weeks = service.weekly_averages(&readings, request.weeks_back, &fields)?;

    info!(weeks = weeks.len(), "Weekly averages computed");
    Ok(Json(WeeklyAveragesResponse {
        weeks_back: request.weeks_back,
        weeks: weeks.into_iter().map(PublicWeeklyAverage::from).collect(),
    }))
}

/// Highest value of one field per local day
#[utoipa::path(
    post,
    path = "/api/v1/vitals/highest-by-day",
    request_body = HighestByDayRequest,
    responses(
        (status = 200, description = "Highest value per day", body = HighestByDayResponse),
        (status = 400, description = "Invalid request or reading", body = ErrorResponse),
    ),
    tag = "vital_trends"
)]
#[instrument(skip(service, request), fields(readings = request.readings.len(), field = %request.field))]
pub async fn get_highest_by_day(
    State(service): State<VitalTrendsService>,
    Json(request): Json<HighestByDayRequest>,
) -> Result<Json<HighestByDayResponse>, ErrorResponse> {
    request.validate()?;

    let field = request.field.parse::<VitalSign>()?;
    let readings = convert_to_domain_readings(request.readings);
    let grouped = service.highest_by_day(&readings, field)?;

    Ok(Json(HighestByDayResponse {
        field,
        days: grouped
            .into_iter()
            .map(|(day, value)| (day.to_string(), value))
            .collect(),
    }))
}
