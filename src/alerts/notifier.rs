use log::warn;
use std::collections::HashMap;

use super::{Alert, AlertLevel};

/// Delivers alerts to the user
pub trait Notifier {
    fn notify(&mut self, alert: &Alert);
}

/// Writes alerts to the log, keeping the last alert shown per slot
#[derive(Default)]
pub struct LogNotifier {
    shown: HashMap<u32, Alert>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alert currently occupying the given slot
    #[cfg(test)]
    pub fn current(&self, slot: u32) -> Option<&Alert> {
        self.shown.get(&slot)
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, alert: &Alert) {
        let label = match alert.level {
            AlertLevel::Danger => "DANGER",
            AlertLevel::Warning => "WARNING",
        };
        warn!(
            "[{}] {} (value {}): {}",
            label, alert.title, alert.value, alert.message
        );
        self.shown.insert(alert.pollutant.slot(), alert.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertDetector;
    use crate::models::Measurement;

    #[test]
    fn newer_alert_replaces_slot() {
        let detector = AlertDetector::new(true);
        let mut notifier = LogNotifier::new();

        let first = Measurement { co2: 1200, ..Default::default() };
        let second = Measurement { co2: 2500, ..Default::default() };
        for alert in detector.check(&first).iter().chain(detector.check(&second).iter()) {
            notifier.notify(alert);
        }

        let current = notifier.current(1001).unwrap();
        assert_eq!(current.level, AlertLevel::Danger);
        assert_eq!(current.value, 2500);
        assert!(notifier.current(1002).is_none());
    }
}
