// Testing utilities for the domain layer
// This module is only available in tests and when the "mock" feature is enabled

use chrono::{DateTime, TimeZone, Utc};

use crate::calendar::Clock;
use crate::entities::VitalSignsReading;

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Freeze the clock at the given instant
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freeze the clock at noon UTC on the given date
    pub fn at_noon(year: i32, month: u32, day: u32) -> Self {
        Self::new(
            Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
                .single()
                .expect("valid test date"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Epoch milliseconds for a UTC wall-clock time
pub fn millis_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test date")
        .timestamp_millis()
}

/// Empty reading taken at the given UTC hour
pub fn reading_on(year: i32, month: u32, day: u32, hour: u32) -> VitalSignsReading {
    VitalSignsReading::at(millis_at(year, month, day, hour, 0))
}
