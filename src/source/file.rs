/// Measurement source backed by a JSON export of the realtime database
use log::debug;
use serde_json::Value;
use std::path::PathBuf;

use super::snapshot::{available_paths, node_at, parse_measurement};
use super::MeasurementSource;
use crate::errors::Result;
use crate::models::Measurement;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    node_path: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, node_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            node_path: node_path.into(),
        }
    }

    async fn read_root(&self) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl MeasurementSource for FileSource {
    async fn fetch(&self) -> Result<Option<Measurement>> {
        let root = self.read_root().await?;
        match node_at(&root, &self.node_path) {
            Some(node) => parse_measurement(node),
            None => {
                debug!("No data exists at '{}'", self.node_path);
                Ok(None)
            }
        }
    }

    async fn available_paths(&self) -> Result<Vec<String>> {
        let root = self.read_root().await?;
        Ok(available_paths(&root))
    }
}
