pub mod aggregation;
pub mod errors;
pub mod projection;
pub mod vital_trends;
pub mod week_window;
pub mod weekly_average;

// Domain services
// This module contains the aggregation engine and the service that composes it.

// Re-export service traits and factory functions
pub use errors::VitalTrendsError;
pub use vital_trends::{
    create_default_vital_trends_service, ChartSeries, VitalTrendsService, VitalTrendsServiceTrait,
    WeeklyOverview,
};
pub use week_window::{Navigation, WeekWindow};
pub use weekly_average::WeeklyAverage;
