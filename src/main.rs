mod alerts;
mod config;
mod errors;
mod models;
mod monitor;
mod prediction;
mod source;
mod utils;

use futures_util::StreamExt;
use log::{error, info, warn};
use time::OffsetDateTime;

use alerts::LogNotifier;
use config::MonitorConfig;
use errors::Result;
use monitor::{Monitor, MonitorState};
use source::{subscribe, FileSource, MeasurementSource, SourceEvent};
use utils::format_datetime;

fn render(state: &MonitorState) {
    match state {
        MonitorState::Updated {
            latest,
            prediction,
            history_len,
            alerts_raised,
        } => {
            info!(
                "Prediction for {} ({} readings in window): {}",
                latest.device_name, history_len, prediction.summary
            );
            if !prediction.details.is_empty() {
                info!("  {}", prediction.details);
            }
            if *alerts_raised > 0 {
                warn!("{} alert(s) raised for this reading", alerts_raised);
            }
        }
        MonitorState::NoData => info!("Waiting for data..."),
        MonitorState::Failed(reason) => error!("Source unavailable: {}", reason),
    }
}

async fn main_loop(config: MonitorConfig) -> Result<()> {
    info!("Starting air quality monitor");

    let source = FileSource::new(&config.snapshot_path, config.node_path.clone());
    let mut monitor = Monitor::new(&config, LogNotifier::new());

    match source.available_paths().await {
        Ok(paths) => info!("Available paths: {}", paths.join(", ")),
        Err(e) => warn!("Error checking paths: {}", e),
    }

    // One-shot fetch so there is something to show before the first change
    let initial = SourceEvent::from(source.fetch().await);
    render(&monitor.handle(initial.clone()));

    // The subscription only reports what differs from the one-shot result
    let mut events = Box::pin(subscribe(source, config.poll_interval, Some(initial)).into_stream());
    while let Some(event) = events.next().await {
        if let SourceEvent::Reading(_) = event {
            info!(
                "Data received at: {}",
                format_datetime(&OffsetDateTime::now_utc())
            );
        }

        render(&monitor.handle(event));
    }

    info!("Subscription closed");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Monitor stopped"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
