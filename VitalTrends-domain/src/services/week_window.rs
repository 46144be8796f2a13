use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::calendar::{labels, DayKey, LocalCalendar, DAYS_PER_WEEK};
use crate::services::errors::VitalTrendsError;

/// Navigation request for a week window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    /// Move one week forward, never past the current week
    Next,
    /// Move one week back
    Prev,
    /// Return to the current week
    Reset,
}

/// Navigable 7-day window, addressed in whole weeks relative to the current week
///
/// `offset` is 0 for the current week and negative for past weeks; it never
/// becomes positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWeekWindow")]
pub struct WeekWindow {
    offset: i32,
}

// Deserialized form; converted through `WeekWindow::at`
#[derive(Deserialize)]
struct RawWeekWindow {
    #[serde(default)]
    offset: i32,
}

impl From<RawWeekWindow> for WeekWindow {
    fn from(raw: RawWeekWindow) -> Self {
        Self::at(raw.offset)
    }
}

impl WeekWindow {
    /// Window on the current week
    pub fn new() -> Self {
        Self::default()
    }

    /// Window at a given offset; offsets in the future are clamped to the current week
    pub fn at(offset: i32) -> Self {
        Self { offset: offset.min(0) }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// True while the window shows the current week
    pub fn is_initial(&self) -> bool {
        self.offset == 0
    }

    pub fn next_week(&mut self) {
        self.offset = self.offset.saturating_add(1).min(0);
    }

    pub fn prev_week(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Apply a single navigation step
    pub fn apply(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Next => self.next_week(),
            Navigation::Prev => self.prev_week(),
            Navigation::Reset => self.reset(),
        }
    }

    /// The seven days of the window in ascending order
    pub fn week_dates(
        &self,
        calendar: &LocalCalendar,
        today: DayKey,
    ) -> Result<[DayKey; DAYS_PER_WEEK], VitalTrendsError> {
        let out_of_range = || VitalTrendsError::WindowOutOfRange {
            offset: i64::from(self.offset),
        };

        let start = calendar
            .shift_weeks(today, i64::from(self.offset))
            .ok_or_else(out_of_range)?;

        let mut dates = [start; DAYS_PER_WEEK];
        for (i, slot) in dates.iter_mut().enumerate().skip(1) {
            *slot = start.plus_days(i as u64).ok_or_else(out_of_range)?;
        }
        Ok(dates)
    }

    /// Month label for the window, e.g. "March" or "February – March"
    pub fn scope_label(
        &self,
        calendar: &LocalCalendar,
        today: DayKey,
    ) -> Result<String, VitalTrendsError> {
        Ok(labels::month_scope(&self.week_dates(calendar, today)?))
    }
}
