pub mod detector;
pub mod notifier;

pub use detector::{Alert, AlertDetector, AlertLevel};
pub use notifier::{LogNotifier, Notifier};
