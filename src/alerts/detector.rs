/// Threshold checks on raw readings
use crate::models::Measurement;

// Inclusive alert thresholds
pub const CO2_WARNING_PPM: i32 = 1000;
pub const CO2_DANGER_PPM: i32 = 2000;
pub const TVOC_WARNING_PPB: i32 = 1000;
pub const TVOC_DANGER_PPB: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Co2,
    Tvoc,
}

impl Pollutant {
    /// Notification slot; a newer alert for the same pollutant replaces the old one
    pub fn slot(&self) -> u32 {
        match self {
            Pollutant::Co2 => 1001,
            Pollutant::Tvoc => 1002,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Pollutant::Co2 => "CO2",
            Pollutant::Tvoc => "TVOC",
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co2 => "ppm",
            Pollutant::Tvoc => "ppb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub pollutant: Pollutant,
    pub level: AlertLevel,
    pub value: i32,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(pollutant: Pollutant, level: AlertLevel, value: i32) -> Self {
        let (title, message) = match level {
            AlertLevel::Danger => (
                format!("{} Level Dangerous", pollutant.name()),
                format!(
                    "{} level is dangerous at {} {}. Please ventilate the room.",
                    pollutant.name(),
                    value,
                    pollutant.unit()
                ),
            ),
            AlertLevel::Warning => (
                format!("{} Level High", pollutant.name()),
                format!(
                    "{} level is high at {} {}. Ventilating the room is recommended.",
                    pollutant.name(),
                    value,
                    pollutant.unit()
                ),
            ),
        };

        Self {
            pollutant,
            level,
            value,
            title,
            message,
        }
    }
}

pub struct AlertDetector {
    enabled: bool,
}

impl AlertDetector {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Inspect a reading and return the alerts it raises, CO2 first
    pub fn check(&self, data: &Measurement) -> Vec<Alert> {
        if !self.enabled {
            return Vec::new();
        }

        [
            classify(Pollutant::Co2, data.co2, CO2_WARNING_PPM, CO2_DANGER_PPM),
            classify(Pollutant::Tvoc, data.tvoc, TVOC_WARNING_PPB, TVOC_DANGER_PPB),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn classify(pollutant: Pollutant, value: i32, warning: i32, danger: i32) -> Option<Alert> {
    if value >= danger {
        Some(Alert::new(pollutant, AlertLevel::Danger, value))
    } else if value >= warning {
        Some(Alert::new(pollutant, AlertLevel::Warning, value))
    } else {
        None
    }
}
