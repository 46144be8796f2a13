use thiserror::Error;

use crate::calendar::{DayKey, TimestampError};
use crate::entities::VitalSign;

/// Errors raised by the aggregation engine
#[derive(Debug, Error)]
pub enum VitalTrendsError {
    /// A reading's timestamp is missing or cannot be read as epoch milliseconds
    #[error("Malformed timestamp on reading {index}: {source}")]
    MalformedTimestamp {
        /// Position of the offending reading in the input
        index: usize,
        #[source]
        source: TimestampError,
    },

    /// A reading lacks a field required in strict mode
    #[error("Reading on {day} is missing field {field}")]
    MissingField { field: VitalSign, day: DayKey },

    /// A field name outside the tracked set
    #[error("Unknown vital sign field: {0}")]
    UnknownField(String),

    /// Calendar arithmetic left the representable date range
    #[error("Week window at offset {offset} is outside the supported date range")]
    WindowOutOfRange { offset: i64 },

    /// Request parameters outside accepted bounds
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
