use crate::calendar::{DayKey, DAYS_PER_WEEK};
use crate::services::aggregation::GroupedByDay;

/// Align per-day values onto a week window
///
/// Slot `i` holds the value grouped under `week_dates[i]`, or `default` when
/// that day had no readings.
pub fn project<T: Clone>(
    grouped: &GroupedByDay<T>,
    week_dates: &[DayKey; DAYS_PER_WEEK],
    default: T,
) -> [T; DAYS_PER_WEEK] {
    std::array::from_fn(|i| {
        grouped
            .get(&week_dates[i])
            .cloned()
            .unwrap_or_else(|| default.clone())
    })
}
