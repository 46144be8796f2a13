//! Engine configuration loaded from the environment

use chrono::{FixedOffset, Local, Offset, Weekday};
use thiserror::Error;

use crate::calendar::LocalCalendar;
use crate::services::aggregation::MissingFieldPolicy;

/// Default upper bound for trailing-week requests
pub const DEFAULT_MAX_WEEKS_BACK: u32 = 52;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidVariable {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for day-key derivation and aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsConfig {
    /// Fixed UTC offset defining local calendar days
    pub utc_offset: FixedOffset,

    /// First day of every week window
    pub week_start: Weekday,

    /// Missing-field handling
    pub missing_field_policy: MissingFieldPolicy,

    /// Largest `weeks_back` the service accepts
    pub max_weeks_back: u32,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            utc_offset: Local::now().offset().fix(),
            week_start: Weekday::Sun,
            missing_field_policy: MissingFieldPolicy::Lenient,
            max_weeks_back: DEFAULT_MAX_WEEKS_BACK,
        }
    }
}

impl TrendsConfig {
    /// Load configuration from `VITALS_*` environment variables
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("VITALS_UTC_OFFSET_MINUTES") {
            config.utc_offset = value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|minutes| minutes.checked_mul(60))
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| ConfigError::InvalidVariable {
                    name: "VITALS_UTC_OFFSET_MINUTES",
                    value: value.clone(),
                    reason: "expected whole minutes between -1439 and 1439".to_string(),
                })?;
        }

        if let Some(value) = lookup("VITALS_WEEK_START") {
            config.week_start = value
                .trim()
                .parse::<Weekday>()
                .map_err(|_| ConfigError::InvalidVariable {
                    name: "VITALS_WEEK_START",
                    value: value.clone(),
                    reason: "expected a weekday name such as sunday or monday".to_string(),
                })?;
        }

        if let Some(value) = lookup("VITALS_STRICT_MISSING_FIELDS") {
            config.missing_field_policy = match value.trim().to_lowercase().as_str() {
                "true" | "1" => MissingFieldPolicy::Strict,
                "false" | "0" | "" => MissingFieldPolicy::Lenient,
                _ => {
                    return Err(ConfigError::InvalidVariable {
                        name: "VITALS_STRICT_MISSING_FIELDS",
                        value: value.clone(),
                        reason: "expected true, false, 1 or 0".to_string(),
                    })
                }
            };
        }

        if let Some(value) = lookup("VITALS_MAX_WEEKS_BACK") {
            config.max_weeks_back = value.trim().parse::<u32>().map_err(|e| ConfigError::InvalidVariable {
                name: "VITALS_MAX_WEEKS_BACK",
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(config)
    }

    /// Calendar described by this configuration
    pub fn calendar(&self) -> LocalCalendar {
        LocalCalendar::new(self.utc_offset, self.week_start)
    }
}
