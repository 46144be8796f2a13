//! Calendar conventions shared by the aggregation engine
//!
//! All grouping happens on local calendar days under one fixed UTC offset.
//! The week starts on a configurable weekday (Sunday by default).

pub mod labels;

use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::ReadingTimestamp;

/// Number of days in a week window
pub const DAYS_PER_WEEK: usize = 7;

/// Canonical identifier of a local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Build a key from year, month and day, if the date exists
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The key `days` days later, if representable
    pub fn plus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }

    /// The key `days` days earlier, if representable
    pub fn minus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Why a timestamp could not be turned into a day key
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    /// The reading carries no timestamp
    #[error("timestamp is missing")]
    Missing,

    /// The timestamp is not a number of epoch milliseconds
    #[error("timestamp {0} is not numeric")]
    NotNumeric(String),

    /// The timestamp is numeric but outside the representable date range
    #[error("timestamp {0} is out of range")]
    OutOfRange(i64),
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Day-key derivation and week math under a fixed local-time convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    offset: FixedOffset,
    week_start: Weekday,
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::system()
    }
}

impl LocalCalendar {
    /// Create a calendar with an explicit UTC offset and first day of the week
    pub fn new(offset: FixedOffset, week_start: Weekday) -> Self {
        Self { offset, week_start }
    }

    /// UTC calendar with Sunday-starting weeks
    pub fn utc() -> Self {
        Self::new(Utc.fix(), Weekday::Sun)
    }

    /// Calendar using the host's current local offset and Sunday-starting weeks
    pub fn system() -> Self {
        Self::new(Local::now().offset().fix(), Weekday::Sun)
    }

    /// First day of every week window
    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Local calendar day of an instant given in epoch milliseconds
    pub fn day_key(&self, millis: i64) -> Result<DayKey, TimestampError> {
        self.offset
            .timestamp_millis_opt(millis)
            .single()
            .map(|instant| DayKey(instant.date_naive()))
            .ok_or(TimestampError::OutOfRange(millis))
    }

    /// Local calendar day of a raw reading timestamp
    ///
    /// Numeric strings are trimmed and parsed. Fractional values, whether
    /// sent as numbers or strings, are truncated toward zero.
    pub fn day_key_for(&self, timestamp: Option<&ReadingTimestamp>) -> Result<DayKey, TimestampError> {
        let millis = match timestamp {
            None => return Err(TimestampError::Missing),
            Some(ReadingTimestamp::Millis(millis)) => *millis,
            Some(ReadingTimestamp::Text(text)) => {
                let trimmed = text.trim();
                match trimmed.parse::<i64>() {
                    Ok(millis) => millis,
                    Err(_) => trimmed
                        .parse::<f64>()
                        .ok()
                        .and_then(truncate_millis)
                        .ok_or_else(|| TimestampError::NotNumeric(format!("{:?}", text)))?,
                }
            }
            Some(ReadingTimestamp::Other(value)) => value
                .as_f64()
                .and_then(truncate_millis)
                .ok_or_else(|| TimestampError::NotNumeric(value.to_string()))?,
        };

        self.day_key(millis)
    }

    /// Local calendar day of the clock's current instant
    pub fn today(&self, clock: &dyn Clock) -> DayKey {
        DayKey(clock.now().with_timezone(&self.offset).date_naive())
    }

    /// First day of the week containing `day`
    pub fn start_of_week(&self, day: DayKey) -> Option<DayKey> {
        let days_into_week = (7 + day.0.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        day.minus_days(u64::from(days_into_week))
    }

    /// First day of the week `weeks` whole weeks away from the week containing `day`
    pub fn shift_weeks(&self, day: DayKey, weeks: i64) -> Option<DayKey> {
        let start = self.start_of_week(day)?;
        let days = weeks.unsigned_abs().checked_mul(DAYS_PER_WEEK as u64)?;
        if weeks < 0 {
            start.minus_days(days)
        } else {
            start.plus_days(days)
        }
    }
}

/// Whole milliseconds of a finite number, truncated toward zero
fn truncate_millis(number: f64) -> Option<i64> {
    if !number.is_finite() {
        return None;
    }
    let truncated = number.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::millis_at;

    #[test]
    fn test_same_local_day_same_key() {
        let calendar = LocalCalendar::utc();
        let morning = calendar.day_key(millis_at(2024, 3, 4, 0, 5)).unwrap();
        let night = calendar.day_key(millis_at(2024, 3, 4, 23, 55)).unwrap();
        assert_eq!(morning, night);
        assert_eq!(morning.to_string(), "2024-03-04");
    }

    #[test]
    fn test_day_boundary_follows_local_offset() {
        // 23:30 UTC is already the next day at UTC+02:00
        let calendar = LocalCalendar::new(FixedOffset::east_opt(2 * 3600).unwrap(), Weekday::Sun);
        let key = calendar.day_key(millis_at(2024, 3, 4, 23, 30)).unwrap();
        assert_eq!(key, DayKey::from_ymd(2024, 3, 5).unwrap());

        let calendar = LocalCalendar::new(FixedOffset::west_opt(5 * 3600).unwrap(), Weekday::Sun);
        let key = calendar.day_key(millis_at(2024, 3, 4, 3, 0)).unwrap();
        assert_eq!(key, DayKey::from_ymd(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_key_order_is_monotonic_with_time() {
        let calendar = LocalCalendar::utc();
        let earlier = calendar.day_key(millis_at(2023, 12, 31, 23, 59)).unwrap();
        let later = calendar.day_key(millis_at(2024, 1, 1, 0, 0)).unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_raw_timestamp_variants() {
        let calendar = LocalCalendar::utc();
        let millis = millis_at(2024, 3, 4, 12, 0);
        let expected = DayKey::from_ymd(2024, 3, 4).unwrap();

        assert_eq!(calendar.day_key_for(Some(&ReadingTimestamp::Millis(millis))), Ok(expected));
        assert_eq!(
            calendar.day_key_for(Some(&ReadingTimestamp::Text(format!(" {} ", millis)))),
            Ok(expected)
        );
        assert_eq!(
            calendar.day_key_for(Some(&ReadingTimestamp::Other(serde_json::json!(millis as f64 + 0.75)))),
            Ok(expected)
        );
    }

    #[test]
    fn test_malformed_timestamps_are_rejected() {
        let calendar = LocalCalendar::utc();

        assert_eq!(calendar.day_key_for(None), Err(TimestampError::Missing));
        assert!(matches!(
            calendar.day_key_for(Some(&ReadingTimestamp::Text("yesterday".to_string()))),
            Err(TimestampError::NotNumeric(_))
        ));
        assert!(matches!(
            calendar.day_key_for(Some(&ReadingTimestamp::Other(serde_json::json!(true)))),
            Err(TimestampError::NotNumeric(_))
        ));
        assert_eq!(calendar.day_key(i64::MAX), Err(TimestampError::OutOfRange(i64::MAX)));
    }

    #[test]
    fn test_fractional_string_matches_fractional_number() {
        let calendar = LocalCalendar::utc();
        let expected = DayKey::from_ymd(2024, 3, 4).unwrap();

        let as_number = calendar.day_key_for(Some(&ReadingTimestamp::Other(serde_json::json!(1709553600000.5))));
        let as_text = calendar.day_key_for(Some(&ReadingTimestamp::Text("1709553600000.5".to_string())));

        assert_eq!(as_number, Ok(expected));
        assert_eq!(as_text, Ok(expected));

        for text in ["NaN", "inf", "12abc"] {
            assert!(matches!(
                calendar.day_key_for(Some(&ReadingTimestamp::Text(text.to_string()))),
                Err(TimestampError::NotNumeric(_))
            ));
        }
    }

    #[test]
    fn test_start_of_week_sunday() {
        let calendar = LocalCalendar::utc();
        // 2024-03-06 is a Wednesday
        let wednesday = DayKey::from_ymd(2024, 3, 6).unwrap();
        assert_eq!(calendar.start_of_week(wednesday), DayKey::from_ymd(2024, 3, 3));

        let sunday = DayKey::from_ymd(2024, 3, 3).unwrap();
        assert_eq!(calendar.start_of_week(sunday), Some(sunday));
    }

    #[test]
    fn test_start_of_week_monday() {
        let calendar = LocalCalendar::new(Utc.fix(), Weekday::Mon);
        let sunday = DayKey::from_ymd(2024, 3, 3).unwrap();
        assert_eq!(calendar.start_of_week(sunday), DayKey::from_ymd(2024, 2, 26));
    }

    #[test]
    fn test_shift_weeks() {
        let calendar = LocalCalendar::utc();
        let wednesday = DayKey::from_ymd(2024, 3, 6).unwrap();
        assert_eq!(calendar.shift_weeks(wednesday, -2), DayKey::from_ymd(2024, 2, 18));
        assert_eq!(calendar.shift_weeks(wednesday, 1), DayKey::from_ymd(2024, 3, 10));
        assert_eq!(calendar.shift_weeks(wednesday, i64::MIN), None);
    }
}
