use log::info;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::errors::{MonitorError, Result};
use crate::prediction::DEFAULT_HISTORY_SIZE;

const DEFAULT_NODE_PATH: &str = "test";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_RESET_AFTER_FAILURES: u32 = 5;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// JSON export of the realtime database root
    pub snapshot_path: PathBuf,
    /// Slash-separated path to the measurement node inside the snapshot
    pub node_path: String,
    pub poll_interval: Duration,
    pub history_size: usize,
    pub alerts_enabled: bool,
    /// Consecutive fetch failures after which trend history is discarded; 0 disables
    pub reset_after_failures: u32,
}

impl MonitorConfig {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value lookup
    ///
    /// `AIRQ_SOURCE_URL` is required and must be a `file://` URL. All other
    /// variables fall back to defaults when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_url = lookup("AIRQ_SOURCE_URL").ok_or_else(|| {
            MonitorError::Config("AIRQ_SOURCE_URL environment variable not set".into())
        })?;
        let snapshot_path = snapshot_path_from_url(&source_url)?;

        let node_path = lookup("AIRQ_NODE_PATH")
            .map(|p| p.trim().trim_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_NODE_PATH.to_string());

        let poll_secs: u64 =
            parse_var(&lookup, "AIRQ_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err(MonitorError::Config(
                "AIRQ_POLL_INTERVAL_SECS must be greater than 0".into(),
            ));
        }

        let history_size: usize = parse_var(&lookup, "AIRQ_HISTORY_SIZE", DEFAULT_HISTORY_SIZE)?;
        if history_size == 0 {
            return Err(MonitorError::Config(
                "AIRQ_HISTORY_SIZE must be greater than 0".into(),
            ));
        }

        let alerts_enabled = parse_var(&lookup, "AIRQ_ALERTS_ENABLED", true)?;
        let reset_after_failures = parse_var(
            &lookup,
            "AIRQ_RESET_AFTER_FAILURES",
            DEFAULT_RESET_AFTER_FAILURES,
        )?;

        info!(
            "Source: {} (node '{}'), poll every {}s, history size {}",
            snapshot_path.display(),
            node_path,
            poll_secs,
            history_size
        );

        Ok(MonitorConfig {
            snapshot_path,
            node_path,
            poll_interval: Duration::from_secs(poll_secs),
            history_size,
            alerts_enabled,
            reset_after_failures,
        })
    }
}

fn snapshot_path_from_url(raw: &str) -> Result<PathBuf> {
    let url = Url::parse(raw.trim())?;
    if url.scheme() != "file" {
        return Err(MonitorError::UnsupportedSource(url.scheme().to_string()));
    }
    url.to_file_path()
        .map_err(|_| MonitorError::Config(format!("Invalid file URL: {}", raw)))
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MonitorError::Config(format!("Invalid value for {}: '{}'", key, raw))),
        None => Ok(default),
    }
}
