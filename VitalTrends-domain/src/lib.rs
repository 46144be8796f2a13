// VitalTrends Domain
// This crate contains the temporal aggregation engine for vital-sign readings

// Day keys, week math and chart labels
pub mod calendar;

// Environment configuration
pub mod config;

// Domain entities
pub mod entities;

// Services that implement the aggregation engine
pub mod services;

// Testing utilities - only available in tests or with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use calendar::{Clock, DayKey, LocalCalendar, SystemClock};
pub use config::{ConfigError, TrendsConfig};
pub use entities::{ReadingTimestamp, VitalSign, VitalSignsReading};
pub use services::VitalTrendsError;
