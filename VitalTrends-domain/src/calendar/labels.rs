use chrono::Datelike;

use super::DayKey;

/// Chart category labels for a run of days, e.g. "Sun 3"
pub fn weekly_labels(dates: &[DayKey]) -> Vec<String> {
    dates
        .iter()
        .map(|day| {
            let date = day.date();
            format!("{} {}", date.format("%a"), date.day())
        })
        .collect()
}

/// Month(s) spanned by a run of days
///
/// A single month yields its full name ("March"); a run crossing a month
/// boundary yields "February – March". An empty run yields an empty label.
pub fn month_scope(dates: &[DayKey]) -> String {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return String::new();
    };

    let (first, last) = (first.date(), last.date());
    if first.year() == last.year() && first.month() == last.month() {
        first.format("%B").to_string()
    } else {
        format!("{} – {}", first.format("%B"), last.format("%B"))
    }
}
