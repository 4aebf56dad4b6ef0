use serde::Deserialize;

/// One sensor reading as stored under the measurement node.
///
/// Field names follow the database record layout; absent fields fall back
/// to zero or an empty string.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Measurement {
    #[serde(rename = "deviceName")]
    pub device_name: String,
    #[serde(rename = "time")]
    pub timestamp: String,
    #[serde(rename = "tempValue")]
    pub temperature: f64,
    #[serde(rename = "humValue")]
    pub humidity: f64,
    #[serde(rename = "co2Value")]
    pub co2: i32,
    #[serde(rename = "tvocValue")]
    pub tvoc: i32,
    #[serde(rename = "pressureValue")]
    pub pressure: f64,
    #[serde(rename = "altitudeValue")]
    pub altitude: f64,
}

/// Text commentary derived from the measurement history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub summary: String,
    pub details: String,
}

impl Prediction {
    pub fn new(summary: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            details: details.into(),
        }
    }
}
