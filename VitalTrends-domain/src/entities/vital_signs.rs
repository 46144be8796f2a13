use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::services::errors::VitalTrendsError;

/// Tracked vital sign fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum VitalSign {
    /// Diastolic blood pressure (the lower number), mmHg
    DiastolicBloodPressure,

    /// Systolic blood pressure (the higher number), mmHg
    SystolicBloodPressure,

    /// Heart rate in beats per minute
    HeartRate,

    /// Respiration rate in breaths per minute
    RespirationRate,

    /// Body temperature
    BodyTemperature,
}

impl VitalSign {
    /// Every tracked field, in declaration order
    pub const ALL: [VitalSign; 5] = [
        VitalSign::DiastolicBloodPressure,
        VitalSign::SystolicBloodPressure,
        VitalSign::HeartRate,
        VitalSign::RespirationRate,
        VitalSign::BodyTemperature,
    ];

    /// Wire name of the field
    pub fn as_str(self) -> &'static str {
        match self {
            VitalSign::DiastolicBloodPressure => "diastolicBloodPressure",
            VitalSign::SystolicBloodPressure => "systolicBloodPressure",
            VitalSign::HeartRate => "heartRate",
            VitalSign::RespirationRate => "respirationRate",
            VitalSign::BodyTemperature => "bodyTemperature",
        }
    }

    /// Human readable name of the field
    pub fn label(self) -> &'static str {
        match self {
            VitalSign::DiastolicBloodPressure => "Diastolic Blood Pressure",
            VitalSign::SystolicBloodPressure => "Systolic Blood Pressure",
            VitalSign::HeartRate => "Heart Rate",
            VitalSign::RespirationRate => "Respiration Rate",
            VitalSign::BodyTemperature => "Body Temperature",
        }
    }

    /// Name of the chart series carrying the daily highest value of this field
    pub fn series_name(self) -> String {
        format!("Highest {}", self.label())
    }
}

impl fmt::Display for VitalSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalSign {
    type Err = VitalTrendsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalSign::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| VitalTrendsError::UnknownField(s.to_string()))
    }
}

/// Raw timestamp of a reading as delivered by the data source
///
/// Sources send epoch milliseconds either as a JSON number or as a numeric
/// string; anything else is carried through so the day-key boundary can
/// reject it with a precise error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingTimestamp {
    /// Integral epoch milliseconds
    Millis(i64),

    /// Epoch milliseconds sent as a string
    Text(String),

    /// Any other JSON value (fractional numbers, booleans, objects)
    Other(serde_json::Value),
}

/// One timestamped vital-sign observation
///
/// A reading need not populate every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignsReading {
    /// When the reading was taken, epoch milliseconds
    #[serde(default, alias = "createdAt")]
    pub timestamp: Option<ReadingTimestamp>,

    /// Diastolic blood pressure (the lower number)
    #[serde(default)]
    pub diastolic_blood_pressure: Option<f64>,

    /// Systolic blood pressure (the higher number)
    #[serde(default)]
    pub systolic_blood_pressure: Option<f64>,

    /// Heart rate in beats per minute
    #[serde(default)]
    pub heart_rate: Option<f64>,

    /// Respiration rate in breaths per minute
    #[serde(default)]
    pub respiration_rate: Option<f64>,

    /// Body temperature
    #[serde(default)]
    pub body_temperature: Option<f64>,
}

impl VitalSignsReading {
    /// Create an empty reading taken at the given epoch milliseconds
    pub fn at(millis: i64) -> Self {
        Self {
            timestamp: Some(ReadingTimestamp::Millis(millis)),
            ..Self::default()
        }
    }

    /// Value of a single field, if the reading carries it
    pub fn value(&self, field: VitalSign) -> Option<f64> {
        match field {
            VitalSign::DiastolicBloodPressure => self.diastolic_blood_pressure,
            VitalSign::SystolicBloodPressure => self.systolic_blood_pressure,
            VitalSign::HeartRate => self.heart_rate,
            VitalSign::RespirationRate => self.respiration_rate,
            VitalSign::BodyTemperature => self.body_temperature,
        }
    }

    /// Builder-style setter for a single field
    pub fn with(mut self, field: VitalSign, value: f64) -> Self {
        let slot = match field {
            VitalSign::DiastolicBloodPressure => &mut self.diastolic_blood_pressure,
            VitalSign::SystolicBloodPressure => &mut self.systolic_blood_pressure,
            VitalSign::HeartRate => &mut self.heart_rate,
            VitalSign::RespirationRate => &mut self.respiration_rate,
            VitalSign::BodyTemperature => &mut self.body_temperature,
        };
        *slot = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vital_sign_round_trips_through_wire_name() {
        for field in VitalSign::ALL {
            assert_eq!(field.as_str().parse::<VitalSign>().unwrap(), field);
        }
    }

    #[test]
    fn test_unknown_field_name_is_rejected() {
        let result = "bloodSugar".parse::<VitalSign>();
        assert!(matches!(result, Err(VitalTrendsError::UnknownField(name)) if name == "bloodSugar"));
    }

    #[test]
    fn test_deserialize_numeric_and_string_timestamps() {
        let readings: Vec<VitalSignsReading> = serde_json::from_str(
            r#"[
                {"timestamp": 1700000000000, "heartRate": 72},
                {"createdAt": "1700000000000", "systolicBloodPressure": 120},
                {"timestamp": 1.5},
                {"diastolicBloodPressure": 80}
            ]"#,
        )
        .unwrap();

        assert_eq!(readings[0].timestamp, Some(ReadingTimestamp::Millis(1_700_000_000_000)));
        assert_eq!(readings[0].value(VitalSign::HeartRate), Some(72.0));
        assert_eq!(readings[1].timestamp, Some(ReadingTimestamp::Text("1700000000000".to_string())));
        assert!(matches!(readings[2].timestamp, Some(ReadingTimestamp::Other(_))));
        assert_eq!(readings[3].timestamp, None);
        assert_eq!(readings[3].value(VitalSign::SystolicBloodPressure), None);
    }

    #[test]
    fn test_series_name() {
        assert_eq!(
            VitalSign::DiastolicBloodPressure.series_name(),
            "Highest Diastolic Blood Pressure"
        );
    }
}
