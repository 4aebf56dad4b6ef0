/// Sliding-window trend analysis over recent measurements
use log::debug;
use std::collections::VecDeque;

use super::trend::{
    Co2Level, HumidityLevel, LongTermChange, TemperatureLevel, TrendDirection, TvocLevel,
    CO2_NOISE_PPM, HUMIDITY_NOISE_PCT, TEMPERATURE_NOISE_C, TVOC_NOISE_PPB,
};
use crate::models::{Measurement, Prediction};
use crate::utils::format_signed;

pub const DEFAULT_HISTORY_SIZE: usize = 10;

// Window length required before the long-term sentence is added
const LONG_TERM_MIN_SAMPLES: usize = 5;

const INSUFFICIENT_DATA: &str = "Not enough data for a prediction yet.";

pub struct TrendAnalyzer {
    history: VecDeque<Measurement>,
    capacity: usize,
}

impl TrendAnalyzer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a measurement, evicting the oldest one once capacity is exceeded
    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.history.push_back(measurement);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
        debug!("Added new measurement. History size: {}", self.history.len());
    }

    /// Build a prediction from the current window
    ///
    /// Empty history yields a fixed notice, a single reading yields a status
    /// report and two or more readings yield a trend report.
    pub fn prediction(&self) -> Prediction {
        match self.history.len() {
            0 => Prediction::new(INSUFFICIENT_DATA, ""),
            1 => match self.history.back() {
                Some(latest) => status_report(latest),
                None => Prediction::new(INSUFFICIENT_DATA, ""),
            },
            _ => self.trend_report(),
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("History cleared");
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[cfg(test)]
    pub fn history(&self) -> impl Iterator<Item = &Measurement> {
        self.history.iter()
    }

    fn trend_report(&self) -> Prediction {
        let n = self.history.len();
        let latest = &self.history[n - 1];
        let previous = &self.history[n - 2];

        let co2_change = i64::from(latest.co2) - i64::from(previous.co2);
        let tvoc_change = i64::from(latest.tvoc) - i64::from(previous.tvoc);
        let co2_trend = TrendDirection::from_int_delta(co2_change, CO2_NOISE_PPM);
        let tvoc_trend = TrendDirection::from_int_delta(tvoc_change, TVOC_NOISE_PPB);
        let temp_trend = TrendDirection::from_float_delta(
            latest.temperature - previous.temperature,
            TEMPERATURE_NOISE_C,
        );
        let hum_trend = TrendDirection::from_float_delta(
            latest.humidity - previous.humidity,
            HUMIDITY_NOISE_PCT,
        );

        let summary = format!(
            "CO2 level is {} and TVOC level is {}.",
            co2_trend, tvoc_trend
        );

        let mut details = format!(
            "Current CO2: {} ppm ({} ppm), TVOC: {} ppb ({} ppb). \
             Temperature {} ({:.1}°C), humidity {} ({:.1}%).",
            latest.co2,
            format_signed(co2_change),
            latest.tvoc,
            format_signed(tvoc_change),
            temp_trend,
            latest.temperature,
            hum_trend,
            latest.humidity,
        );

        if n >= LONG_TERM_MIN_SAMPLES {
            // Compare against the oldest reading still in the window
            let oldest = &self.history[0];
            match LongTermChange::between(oldest.co2, latest.co2) {
                Some(change) => details.push_str(&format!(
                    " Over the last {} measurements CO2 showed a {:.1}% {}.",
                    n,
                    change.percent(),
                    change.label()
                )),
                None => debug!("Oldest CO2 reading is 0, skipping long-term analysis"),
            }
        }

        Prediction::new(summary, details)
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

fn status_report(data: &Measurement) -> Prediction {
    let summary = format!(
        "Current air quality: CO2 level {}, VOC level {}.",
        Co2Level::classify(data.co2),
        TvocLevel::classify(data.tvoc)
    );

    let details = format!(
        "Temperature is {} ({:.1}°C) and humidity is {} ({:.1}%). \
         CO2: {} ppm, TVOC: {} ppb. Pressure: {:.1} hPa.",
        TemperatureLevel::classify(data.temperature),
        data.temperature,
        HumidityLevel::classify(data.humidity),
        data.humidity,
        data.co2,
        data.tvoc,
        data.pressure,
    );

    Prediction::new(summary, details)
}
