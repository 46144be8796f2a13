use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{DayKey, LocalCalendar, DAYS_PER_WEEK};
use crate::entities::{VitalSign, VitalSignsReading};
use crate::services::aggregation::{group_readings_by_day, MissingFieldPolicy};
use crate::services::errors::VitalTrendsError;

/// Averages for one week of the trailing range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
    /// First day of the week
    pub week_start: DayKey,

    /// Number of days in the week that had at least one reading
    pub populated_days: usize,

    /// Average per requested field, always divided by the full week length
    pub averages: IndexMap<VitalSign, f64>,
}

/// Average the requested fields over the current week and `weeks_back` prior weeks
///
/// Each day contributes the first reading recorded on it. Every week's sum is
/// divided by 7 regardless of how many days had readings, so empty days
/// dilute the average. A bucketed reading that lacks a requested field makes
/// that field's average NaN, or fails the call under the strict policy.
///
/// Results are ordered oldest week first and hold `weeks_back + 1` entries.
pub fn average_by_weeks(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
    today: DayKey,
    weeks_back: u32,
    fields: &[VitalSign],
    policy: MissingFieldPolicy,
) -> Result<Vec<WeeklyAverage>, VitalTrendsError> {
    let first_week = calendar
        .shift_weeks(today, -i64::from(weeks_back))
        .ok_or(VitalTrendsError::WindowOutOfRange {
            offset: -i64::from(weeks_back),
        })?;

    let grouped = group_readings_by_day(readings, calendar, None)?;

    // Duplicate fields collapse onto their first position
    let mut requested: Vec<VitalSign> = Vec::with_capacity(fields.len());
    for field in fields {
        if !requested.contains(field) {
            requested.push(*field);
        }
    }

    let mut result = Vec::new();
    for week in 0..=u64::from(weeks_back) {
        let week_offset = week as i64 - i64::from(weeks_back);
        let out_of_range = || VitalTrendsError::WindowOutOfRange { offset: week_offset };

        let week_start = first_week
            .plus_days(week * DAYS_PER_WEEK as u64)
            .ok_or_else(out_of_range)?;

        let mut bucket: Vec<(DayKey, &VitalSignsReading)> = Vec::with_capacity(DAYS_PER_WEEK);
        for day_index in 0..DAYS_PER_WEEK as u64 {
            let day = week_start.plus_days(day_index).ok_or_else(out_of_range)?;
            if let Some(reading) = grouped.get(&day) {
                bucket.push((day, *reading));
            }
        }

        let mut averages = IndexMap::with_capacity(requested.len());
        for &field in &requested {
            let mut sum = 0.0;
            for (day, reading) in &bucket {
                match (reading.value(field), policy) {
                    (Some(value), _) => sum += value,
                    (None, MissingFieldPolicy::Lenient) => sum += f64::NAN,
                    (None, MissingFieldPolicy::Strict) => {
                        return Err(VitalTrendsError::MissingField { field, day: *day });
                    }
                }
            }

            let average = sum / DAYS_PER_WEEK as f64;
            if average.is_nan() {
                warn!(%field, %week_start, "Weekly average is NaN because a reading lacks the field");
            }
            averages.insert(field, average);
        }

        result.push(WeeklyAverage {
            week_start,
            populated_days: bucket.len(),
            averages,
        });
    }

    debug!(weeks = result.len(), fields = requested.len(), "Computed weekly averages");
    Ok(result)
}
