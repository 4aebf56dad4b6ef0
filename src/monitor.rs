//! Wires incoming readings to the analyzer and alerting
use log::{error, info, warn};

use crate::alerts::{AlertDetector, Notifier};
use crate::config::MonitorConfig;
use crate::models::{Measurement, Prediction};
use crate::prediction::TrendAnalyzer;
use crate::source::SourceEvent;

/// What the presentation layer should show after an event
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorState {
    Updated {
        latest: Measurement,
        prediction: Prediction,
        history_len: usize,
        alerts_raised: usize,
    },
    /// The source answered but the node holds no data
    NoData,
    Failed(String),
}

pub struct Monitor<N: Notifier> {
    analyzer: TrendAnalyzer,
    detector: AlertDetector,
    notifier: N,
    reset_after_failures: u32,
    consecutive_failures: u32,
}

impl<N: Notifier> Monitor<N> {
    pub fn new(config: &MonitorConfig, notifier: N) -> Self {
        Self::with_parts(
            TrendAnalyzer::new(config.history_size),
            AlertDetector::new(config.alerts_enabled),
            notifier,
            config.reset_after_failures,
        )
    }

    pub fn with_parts(
        analyzer: TrendAnalyzer,
        detector: AlertDetector,
        notifier: N,
        reset_after_failures: u32,
    ) -> Self {
        Self {
            analyzer,
            detector,
            notifier,
            reset_after_failures,
            consecutive_failures: 0,
        }
    }

    /// Process one event from the data source
    ///
    /// A reading that follows a run of at least `reset_after_failures`
    /// failed fetches starts a fresh trend window.
    pub fn handle(&mut self, event: SourceEvent) -> MonitorState {
        match event {
            SourceEvent::Reading(data) => {
                if self.reset_after_failures > 0
                    && self.consecutive_failures >= self.reset_after_failures
                {
                    warn!(
                        "Source recovered after {} failed fetches, discarding trend history",
                        self.consecutive_failures
                    );
                    self.reset();
                }
                self.consecutive_failures = 0;
                self.process_reading(data)
            }
            SourceEvent::Empty => {
                self.consecutive_failures = 0;
                warn!("No data found at the configured node. Check the database layout.");
                MonitorState::NoData
            }
            SourceEvent::Failed(reason) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                error!("Error in data stream: {}", reason);
                MonitorState::Failed(reason)
            }
        }
    }

    /// Drop accumulated trend context, e.g. after a long disconnection
    pub fn reset(&mut self) {
        if !self.analyzer.is_empty() {
            self.analyzer.clear_history();
        }
    }

    #[cfg(test)]
    pub fn analyzer(&self) -> &TrendAnalyzer {
        &self.analyzer
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn process_reading(&mut self, data: Measurement) -> MonitorState {
        info!(
            "Reading from {} at {}: CO2={} ppm, TVOC={} ppb, temp={:.1}°C, humidity={:.1}%, \
             pressure={:.1} hPa, altitude={:.1} m",
            data.device_name,
            data.timestamp,
            data.co2,
            data.tvoc,
            data.temperature,
            data.humidity,
            data.pressure,
            data.altitude
        );

        self.analyzer.add_measurement(data.clone());
        let prediction = self.analyzer.prediction();

        let alerts = self.detector.check(&data);
        for alert in &alerts {
            self.notifier.notify(alert);
        }

        MonitorState::Updated {
            latest: data,
            prediction,
            history_len: self.analyzer.len(),
            alerts_raised: alerts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{Alert, LogNotifier};

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Vec<Alert>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, alert: &Alert) {
            self.alerts.push(alert.clone());
        }
    }

    fn reading(co2: i32, tvoc: i32) -> SourceEvent {
        SourceEvent::Reading(Measurement {
            device_name: "lab".to_string(),
            co2,
            tvoc,
            temperature: 21.0,
            humidity: 40.0,
            ..Default::default()
        })
    }

    fn monitor() -> Monitor<RecordingNotifier> {
        Monitor::with_parts(
            TrendAnalyzer::new(10),
            AlertDetector::new(true),
            RecordingNotifier::default(),
            3,
        )
    }

    fn summary_of(state: MonitorState) -> String {
        match state {
            MonitorState::Updated { prediction, .. } => prediction.summary,
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn reading_updates_prediction_and_alerts() {
        let mut monitor = monitor();

        let state = monitor.handle(reading(400, 100));
        match state {
            MonitorState::Updated {
                prediction,
                history_len,
                alerts_raised,
                ..
            } => {
                assert!(prediction.summary.contains("good"));
                assert_eq!(history_len, 1);
                assert_eq!(alerts_raised, 0);
            }
            other => panic!("unexpected state {:?}", other),
        }

        let state = monitor.handle(reading(1100, 2100));
        match state {
            MonitorState::Updated {
                latest,
                prediction,
                history_len,
                alerts_raised,
            } => {
                assert_eq!(latest.co2, 1100);
                assert_eq!(
                    prediction.summary,
                    "CO2 level is rising and TVOC level is rising."
                );
                assert_eq!(history_len, 2);
                assert_eq!(alerts_raised, 2);
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(monitor.notifier().alerts.len(), 2);
    }

    #[test]
    fn sparse_readings_still_build_a_trend() {
        // A slow device: nothing but the occasional change between readings
        let mut monitor = monitor();
        for co2 in [400, 410, 420, 430] {
            monitor.handle(reading(co2, 100));
            monitor.handle(SourceEvent::Empty);
        }

        let state = monitor.handle(reading(440, 100));
        match state {
            MonitorState::Updated {
                prediction,
                history_len,
                ..
            } => {
                assert_eq!(history_len, 5);
                assert!(prediction.summary.starts_with("CO2 level is"));
                assert!(prediction
                    .details
                    .ends_with("Over the last 5 measurements CO2 showed a 10.0% increase."));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn short_outage_keeps_history() {
        let mut monitor = monitor();
        monitor.handle(reading(400, 100));
        monitor.handle(SourceEvent::Failed("timeout".into()));
        monitor.handle(SourceEvent::Failed("timeout".into()));

        let summary = summary_of(monitor.handle(reading(500, 100)));
        assert_eq!(summary, "CO2 level is rising and TVOC level is stable.");
        assert_eq!(monitor.analyzer().len(), 2);
    }

    #[test]
    fn long_outage_starts_a_fresh_window() {
        let mut monitor = monitor();
        monitor.handle(reading(400, 100));
        monitor.handle(reading(450, 100));
        for _ in 0..3 {
            monitor.handle(SourceEvent::Failed("connection refused".into()));
        }

        let summary = summary_of(monitor.handle(reading(900, 100)));
        assert!(summary.starts_with("Current air quality:"));
        assert_eq!(monitor.analyzer().len(), 1);

        // the failure run is over, the next reading extends the window
        monitor.handle(reading(950, 100));
        assert_eq!(monitor.analyzer().len(), 2);
    }

    #[test]
    fn zero_threshold_never_resets() {
        let mut monitor = Monitor::with_parts(
            TrendAnalyzer::new(10),
            AlertDetector::new(true),
            RecordingNotifier::default(),
            0,
        );
        monitor.handle(reading(400, 100));
        for _ in 0..50 {
            monitor.handle(SourceEvent::Failed("offline".into()));
        }
        monitor.handle(reading(420, 100));
        assert_eq!(monitor.analyzer().len(), 2);
    }

    #[test]
    fn empty_and_failure_are_distinguished() {
        let mut monitor = monitor();
        assert_eq!(monitor.handle(SourceEvent::Empty), MonitorState::NoData);
        assert_eq!(
            monitor.handle(SourceEvent::Failed("timeout".into())),
            MonitorState::Failed("timeout".into())
        );
        // neither touches the history
        assert!(monitor.analyzer().is_empty());
    }

    #[test]
    fn reset_clears_trend_context() {
        let mut monitor = monitor();
        monitor.handle(reading(400, 100));
        monitor.handle(reading(600, 100));
        monitor.reset();
        assert!(monitor.analyzer().is_empty());
        assert!(monitor.analyzer().prediction().details.is_empty());
    }

    #[test]
    fn builds_from_config() {
        let config = MonitorConfig {
            snapshot_path: "/tmp/db.json".into(),
            node_path: "test".into(),
            poll_interval: std::time::Duration::from_secs(1),
            history_size: 3,
            alerts_enabled: false,
            reset_after_failures: 5,
        };
        let mut monitor = Monitor::new(&config, LogNotifier::new());
        for co2 in [2500, 2600, 2700, 2800] {
            monitor.handle(reading(co2, 0));
        }
        assert_eq!(monitor.analyzer().len(), 3);
        assert!(monitor.notifier().current(1001).is_none());
    }
}
