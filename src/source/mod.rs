pub mod file;
pub mod snapshot;
pub mod subscription;

use std::future::Future;

use crate::errors::Result;
use crate::models::Measurement;

pub use file::FileSource;
pub use subscription::subscribe;

/// Outcome delivered to consumers of a data source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Reading(Measurement),
    /// The source answered but there is no record at the node
    Empty,
    Failed(String),
}

impl From<Result<Option<Measurement>>> for SourceEvent {
    fn from(result: Result<Option<Measurement>>) -> Self {
        match result {
            Ok(Some(data)) => SourceEvent::Reading(data),
            Ok(None) => SourceEvent::Empty,
            Err(e) => SourceEvent::Failed(e.to_string()),
        }
    }
}

/// Supplies the latest measurement record on demand
pub trait MeasurementSource {
    /// Fetch the current record once
    fn fetch(&self) -> impl Future<Output = Result<Option<Measurement>>> + Send;

    /// Paths present in the source, for diagnosing a wrong node path
    fn available_paths(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}
