use std::collections::btree_map::{BTreeMap, Entry};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{DayKey, LocalCalendar};
use crate::entities::{VitalSign, VitalSignsReading};
use crate::services::errors::VitalTrendsError;

/// Values keyed by local calendar day, in ascending day order
pub type GroupedByDay<T> = BTreeMap<DayKey, T>;

/// Tie-break comparator: returns true when `new` should replace `existing`
pub type IsBetter<'f, T> = &'f dyn Fn(&T, &T) -> bool;

/// How aggregation treats readings that lack a requested field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Absent values never win a comparison and turn weekly averages into NaN
    #[default]
    Lenient,

    /// Absent values fail the call with `VitalTrendsError::MissingField`
    Strict,
}

/// Strictly greater wins, so ties keep the earlier value
pub fn is_higher(existing: &f64, new: &f64) -> bool {
    new > existing
}

/// Group readings by local day and reduce each day to a single value
///
/// Readings are processed in input order. `select` extracts the value of a
/// reading; `Ok(None)` means the reading has nothing to contribute, which
/// never displaces a value already held for that day. The first value seen
/// for a day is kept and later ones replace it only when `is_better` says so.
/// Without a comparator the first value of each day is final.
///
/// The first reading with an unusable timestamp aborts the call.
pub fn group_by_day<'a, T, F>(
    readings: &'a [VitalSignsReading],
    calendar: &LocalCalendar,
    mut select: F,
    is_better: Option<IsBetter<'_, T>>,
) -> Result<GroupedByDay<T>, VitalTrendsError>
where
    F: FnMut(DayKey, &'a VitalSignsReading) -> Result<Option<T>, VitalTrendsError>,
{
    let mut grouped = GroupedByDay::new();

    for (index, reading) in readings.iter().enumerate() {
        let day = calendar
            .day_key_for(reading.timestamp.as_ref())
            .map_err(|source| VitalTrendsError::MalformedTimestamp { index, source })?;

        let Some(value) = select(day, reading)? else {
            continue;
        };

        match grouped.entry(day) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                if is_better.map_or(false, |is_better| is_better(slot.get(), &value)) {
                    slot.insert(value);
                }
            }
        }
    }

    debug!(readings = readings.len(), days = grouped.len(), "Grouped readings by day");
    Ok(grouped)
}

/// Group whole readings by local day
///
/// Without a comparator the first reading of each day is kept and later
/// readings on the same day are ignored; fields are never merged.
pub fn group_readings_by_day<'a>(
    readings: &'a [VitalSignsReading],
    calendar: &LocalCalendar,
    is_better: Option<IsBetter<'_, &'a VitalSignsReading>>,
) -> Result<GroupedByDay<&'a VitalSignsReading>, VitalTrendsError> {
    group_by_day(readings, calendar, |_, reading| Ok(Some(reading)), is_better)
}

/// Group a single field by local day
pub fn group_field_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
    field: VitalSign,
    is_better: Option<IsBetter<'_, f64>>,
    policy: MissingFieldPolicy,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    group_by_day(
        readings,
        calendar,
        |day, reading| match (reading.value(field), policy) {
            (Some(value), _) => Ok(Some(value)),
            (None, MissingFieldPolicy::Lenient) => Ok(None),
            (None, MissingFieldPolicy::Strict) => Err(VitalTrendsError::MissingField { field, day }),
        },
        is_better,
    )
}

/// Highest value of `field` per local day, earliest reading winning ties
pub fn highest_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
    field: VitalSign,
    policy: MissingFieldPolicy,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    let comparator: IsBetter<'_, f64> = &is_higher;
    group_field_by_day(readings, calendar, field, Some(comparator), policy)
}

pub fn highest_diastolic_blood_pressure_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    highest_by_day(readings, calendar, VitalSign::DiastolicBloodPressure, MissingFieldPolicy::Lenient)
}

pub fn highest_systolic_blood_pressure_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    highest_by_day(readings, calendar, VitalSign::SystolicBloodPressure, MissingFieldPolicy::Lenient)
}

pub fn highest_heart_rate_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    highest_by_day(readings, calendar, VitalSign::HeartRate, MissingFieldPolicy::Lenient)
}

pub fn highest_respiration_rate_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    highest_by_day(readings, calendar, VitalSign::RespirationRate, MissingFieldPolicy::Lenient)
}

pub fn highest_body_temperature_by_day(
    readings: &[VitalSignsReading],
    calendar: &LocalCalendar,
) -> Result<GroupedByDay<f64>, VitalTrendsError> {
    highest_by_day(readings, calendar, VitalSign::BodyTemperature, MissingFieldPolicy::Lenient)
}
