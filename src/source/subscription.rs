/// Push-style delivery of measurement changes from a polled source
use futures_util::stream::{self, Stream};
use log::{debug, info};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::{MeasurementSource, SourceEvent};

const EVENT_BUFFER: usize = 16;

/// Handle to a running subscription
///
/// Events arrive in order until `stop()` is called or the handle is dropped.
pub struct Subscription {
    events: mpsc::Receiver<SourceEvent>,
    task: Option<JoinHandle<()>>,
}

/// Start polling `source` every `period`, delivering every result that
/// differs from the previously delivered one
///
/// `last_seen` is the result the caller already holds, e.g. from a one-shot
/// fetch; with None the first result is always delivered.
pub fn subscribe<S>(source: S, period: Duration, last_seen: Option<SourceEvent>) -> Subscription
where
    S: MeasurementSource + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    let task = tokio::spawn(async move {
        info!("Starting to listen for changes");
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = last_seen;

        loop {
            ticker.tick().await;
            let event = SourceEvent::from(source.fetch().await);

            if last.as_ref() == Some(&event) {
                continue;
            }

            debug!("Data changed: {:?}", event);
            if tx.send(event.clone()).await.is_err() {
                debug!("Subscriber gone, stopping poll loop");
                break;
            }
            last = Some(event);
        }
    });

    Subscription {
        events: rx,
        task: Some(task),
    }
}

impl Subscription {
    /// Wait for the next event; None once the subscription is stopped
    pub async fn next(&mut self) -> Option<SourceEvent> {
        if self.task.is_none() {
            return None;
        }
        self.events.recv().await
    }

    /// Stop polling and discard any undelivered events
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.events.close();
            while self.events.try_recv().is_ok() {}
            info!("Removing listener as subscription is closing");
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = SourceEvent> {
        stream::unfold(self, |mut subscription| async move {
            let event = subscription.next().await?;
            Some((event, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
