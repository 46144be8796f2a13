use serde::Serialize;
use tracing::{debug, instrument};

use crate::calendar::{labels, Clock, DayKey, LocalCalendar, SystemClock, DAYS_PER_WEEK};
use crate::config::TrendsConfig;
use crate::entities::{VitalSign, VitalSignsReading};
use crate::services::aggregation::{highest_by_day, GroupedByDay, MissingFieldPolicy};
use crate::services::errors::VitalTrendsError;
use crate::services::projection::project;
use crate::services::week_window::WeekWindow;
use crate::services::weekly_average::{average_by_weeks, WeeklyAverage};

/// Value shown for days without readings
pub const MISSING_DAY_VALUE: f64 = 0.0;

/// One chart series: the daily highest value of a field across the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Display name, e.g. "Highest Heart Rate"
    pub name: String,

    /// Field the series was computed from
    pub field: VitalSign,

    /// Seven values aligned with the window's days
    pub data: [f64; DAYS_PER_WEEK],
}

/// Everything a weekly chart needs to render one window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyOverview {
    pub offset: i32,
    pub is_initial: bool,
    pub week_dates: [DayKey; DAYS_PER_WEEK],

    /// X-axis labels, one per day
    pub categories: Vec<String>,

    /// Month(s) covered by the window
    pub scope_label: String,

    pub series: Vec<ChartSeries>,
}

/// Trait for vital-sign trend operations
pub trait VitalTrendsServiceTrait {
    /// Highest value of a field per local day
    fn highest_by_day(
        &self,
        readings: &[VitalSignsReading],
        field: VitalSign,
    ) -> Result<GroupedByDay<f64>, VitalTrendsError>;

    /// The seven days shown by a window
    fn week_dates(&self, window: &WeekWindow) -> Result<[DayKey; DAYS_PER_WEEK], VitalTrendsError>;

    /// Chart categories, series and scope label for one window
    fn weekly_overview(
        &self,
        readings: &[VitalSignsReading],
        window: &WeekWindow,
        fields: &[VitalSign],
    ) -> Result<WeeklyOverview, VitalTrendsError>;

    /// Fixed-denominator weekly averages over the current and `weeks_back` prior weeks
    fn weekly_averages(
        &self,
        readings: &[VitalSignsReading],
        weeks_back: u32,
        fields: &[VitalSign],
    ) -> Result<Vec<WeeklyAverage>, VitalTrendsError>;
}

/// Vital-sign trend service bound to a calendar and a clock
pub struct VitalTrendsService<C: Clock> {
    calendar: LocalCalendar,
    clock: C,
    policy: MissingFieldPolicy,
    max_weeks_back: u32,
}

impl<C: Clock> VitalTrendsService<C> {
    /// Create a new service from configuration and a clock
    pub fn new(config: &TrendsConfig, clock: C) -> Self {
        Self {
            calendar: config.calendar(),
            clock,
            policy: config.missing_field_policy,
            max_weeks_back: config.max_weeks_back,
        }
    }

    fn today(&self) -> DayKey {
        self.calendar.today(&self.clock)
    }
}

impl<C: Clock> VitalTrendsServiceTrait for VitalTrendsService<C> {
    #[instrument(skip(self, readings), fields(readings = readings.len()))]
    fn highest_by_day(
        &self,
        readings: &[VitalSignsReading],
        field: VitalSign,
    ) -> Result<GroupedByDay<f64>, VitalTrendsError> {
        highest_by_day(readings, &self.calendar, field, self.policy)
    }

    fn week_dates(&self, window: &WeekWindow) -> Result<[DayKey; DAYS_PER_WEEK], VitalTrendsError> {
        window.week_dates(&self.calendar, self.today())
    }

    #[instrument(skip(self, readings, window), fields(readings = readings.len(), offset = window.offset()))]
    fn weekly_overview(
        &self,
        readings: &[VitalSignsReading],
        window: &WeekWindow,
        fields: &[VitalSign],
    ) -> Result<WeeklyOverview, VitalTrendsError> {
        let week_dates = self.week_dates(window)?;

        let series = fields
            .iter()
            .map(|&field| {
                let grouped = highest_by_day(readings, &self.calendar, field, self.policy)?;
                Ok(ChartSeries {
                    name: field.series_name(),
                    field,
                    data: project(&grouped, &week_dates, MISSING_DAY_VALUE),
                })
            })
            .collect::<Result<Vec<_>, VitalTrendsError>>()?;

        debug!(series = series.len(), "Built weekly overview");

        Ok(WeeklyOverview {
            offset: window.offset(),
            is_initial: window.is_initial(),
            week_dates,
            categories: labels::weekly_labels(&week_dates),
            scope_label: labels::month_scope(&week_dates),
            series,
        })
    }

    #[instrument(skip(self, readings), fields(readings = readings.len()))]
    fn weekly_averages(
        &self,
        readings: &[VitalSignsReading],
        weeks_back: u32,
        fields: &[VitalSign],
    ) -> Result<Vec<WeeklyAverage>, VitalTrendsError> {
        if weeks_back > self.max_weeks_back {
            return Err(VitalTrendsError::InvalidRequest(format!(
                "weeks_back must not exceed {}",
                self.max_weeks_back
            )));
        }

        average_by_weeks(readings, &self.calendar, self.today(), weeks_back, fields, self.policy)
    }
}

/// Create a service from the environment configuration and the system clock
pub fn create_default_vital_trends_service(
    config: &TrendsConfig,
) -> impl VitalTrendsServiceTrait + Send + Sync {
    VitalTrendsService::new(config, SystemClock)
}
