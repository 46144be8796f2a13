use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use vital_trends_domain::services::{ChartSeries, Navigation, WeeklyAverage, WeeklyOverview};
use vital_trends_domain::{ReadingTimestamp, VitalSign, VitalSignsReading, VitalTrendsError};

/// Public representation of a vital-sign reading
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicVitalSignsReading {
    /// When the reading was taken: epoch milliseconds as a number or numeric string
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub timestamp: Option<serde_json::Value>,

    /// Diastolic blood pressure (the lower number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diastolic_blood_pressure: Option<f64>,

    /// Systolic blood pressure (the higher number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systolic_blood_pressure: Option<f64>,

    /// Heart rate in beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    /// Respiration rate in breaths per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiration_rate: Option<f64>,

    /// Body temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_temperature: Option<f64>,
}

impl From<PublicVitalSignsReading> for VitalSignsReading {
    fn from(reading: PublicVitalSignsReading) -> Self {
        let timestamp = match reading.timestamp {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(ReadingTimestamp::Text(text)),
            Some(value) => Some(match value.as_i64() {
                Some(millis) => ReadingTimestamp::Millis(millis),
                None => ReadingTimestamp::Other(value),
            }),
        };

        VitalSignsReading {
            timestamp,
            diastolic_blood_pressure: reading.diastolic_blood_pressure,
            systolic_blood_pressure: reading.systolic_blood_pressure,
            heart_rate: reading.heart_rate,
            respiration_rate: reading.respiration_rate,
            body_temperature: reading.body_temperature,
        }
    }
}

/// Convert public readings into domain readings, preserving order
pub fn convert_to_domain_readings(readings: Vec<PublicVitalSignsReading>) -> Vec<VitalSignsReading> {
    readings.into_iter().map(VitalSignsReading::from).collect()
}

/// Parse requested field names, falling back to `default` when none are given
pub fn parse_fields(
    fields: Option<&[String]>,
    default: &[VitalSign],
) -> Result<Vec<VitalSign>, VitalTrendsError> {
    match fields {
        None => Ok(default.to_vec()),
        Some(names) => names.iter().map(|name| name.parse::<VitalSign>()).collect(),
    }
}

/// Request payload for a weekly chart overview
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyOverviewRequest {
    /// Readings to aggregate, in source order
    #[validate(length(max = 50000, message = "At most 50000 readings per request"))]
    pub readings: Vec<PublicVitalSignsReading>,

    /// Current window offset in weeks (0 = this week, negative = past weeks)
    #[serde(default)]
    #[validate(range(max = 0, message = "Offset cannot point to a future week"))]
    pub offset: i32,

    /// Optional navigation step applied to `offset` before building the overview
    pub navigation: Option<Navigation>,

    /// Fields to chart (default: diastolic and systolic blood pressure)
    pub fields: Option<Vec<String>>,
}

/// Public representation of one chart series
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicChartSeries {
    /// Display name of the series
    pub name: String,

    /// Field the series was computed from
    pub field: VitalSign,

    /// Seven daily values aligned with `categories`
    pub data: Vec<f64>,
}

impl From<ChartSeries> for PublicChartSeries {
    fn from(series: ChartSeries) -> Self {
        Self {
            name: series.name,
            field: series.field,
            data: series.data.to_vec(),
        }
    }
}

/// Weekly chart payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyOverviewResponse {
    /// Window offset after navigation
    pub offset: i32,

    /// True when the window shows the current week
    pub is_initial: bool,

    /// The seven days of the window (YYYY-MM-DD)
    pub week_dates: Vec<String>,

    /// X-axis labels, one per day
    pub categories: Vec<String>,

    /// Month(s) spanned by the window
    pub scope_label: String,

    /// One series per requested field
    pub series: Vec<PublicChartSeries>,
}

impl From<WeeklyOverview> for WeeklyOverviewResponse {
    fn from(overview: WeeklyOverview) -> Self {
        Self {
            offset: overview.offset,
            is_initial: overview.is_initial,
            week_dates: overview.week_dates.iter().map(|day| day.to_string()).collect(),
            categories: overview.categories,
            scope_label: overview.scope_label,
            series: overview.series.into_iter().map(PublicChartSeries::from).collect(),
        }
    }
}

fn default_weeks_back() -> u32 {
    1
}

/// Request payload for trailing weekly averages
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAveragesRequest {
    /// Readings to average, in source order
    #[validate(length(max = 50000, message = "At most 50000 readings per request"))]
    pub readings: Vec<PublicVitalSignsReading>,

    /// Number of weeks before the current one to include (default: 1)
    #[serde(default = "default_weeks_back")]
    pub weeks_back: u32,

    /// Fields to average (default: diastolic blood pressure)
    pub fields: Option<Vec<String>>,
}

/// Public representation of one week's averages
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicWeeklyAverage {
    /// First day of the week (YYYY-MM-DD)
    pub week_start: String,

    /// Days in the week that had at least one reading
    pub populated_days: usize,

    /// Average per field; null when a reading in the week lacked the field
    #[schema(value_type = Object)]
    pub averages: IndexMap<String, Option<f64>>,
}

impl From<WeeklyAverage> for PublicWeeklyAverage {
    fn from(week: WeeklyAverage) -> Self {
        Self {
            week_start: week.week_start.to_string(),
            populated_days: week.populated_days,
            averages: week
                .averages
                .into_iter()
                .map(|(field, average)| {
                    let average = if average.is_nan() { None } else { Some(average) };
                    (field.as_str().to_string(), average)
                })
                .collect(),
        }
    }
}

/// Trailing weekly averages, oldest week first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAveragesResponse {
    pub weeks_back: u32,
    pub weeks: Vec<PublicWeeklyAverage>,
}

/// Request payload for per-day highest values of one field
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighestByDayRequest {
    /// Readings to aggregate, in source order
    #[validate(length(max = 50000, message = "At most 50000 readings per request"))]
    pub readings: Vec<PublicVitalSignsReading>,

    /// Field to aggregate
    pub field: String,
}

/// Highest value per local day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HighestByDayResponse {
    pub field: VitalSign,

    /// Day (YYYY-MM-DD) to highest value
    #[schema(value_type = Object)]
    pub days: BTreeMap<String, f64>,
}
