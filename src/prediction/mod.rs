pub mod analyzer;
pub mod trend;

pub use analyzer::{TrendAnalyzer, DEFAULT_HISTORY_SIZE};
