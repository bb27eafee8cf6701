//! Dashboard side of the service: polls the latest reading of one station
//! and turns it into a view model of five gauges.

use aquapoll_core::gauge::{self, GaugeView};
use aquapoll_core::ReadingMessage;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

mod client;

pub use client::{DashboardClient, FetchOutcome, StartOutcome};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub connection: Connection,
    pub timestamp_label: String,
    pub status_message: String,
    pub gauges: Vec<GaugeView>,
}

impl DashboardView {
    /// No station picked, nothing is polled
    pub fn unselected() -> DashboardView {
        DashboardView {
            connection: Connection::Offline,
            timestamp_label: "--".to_owned(),
            status_message: "Please select a refilling station to start monitoring.".to_owned(),
            gauges: gauge::error_gauges(),
        }
    }

    pub fn online(reading: &ReadingMessage) -> DashboardView {
        DashboardView {
            connection: Connection::Online,
            timestamp_label: reading.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            status_message: "Connected to server. Data refreshing...".to_owned(),
            gauges: gauge::gauges(reading),
        }
    }

    pub fn from_outcome(outcome: &FetchOutcome) -> DashboardView {
        match outcome {
            FetchOutcome::Reading(reading) => DashboardView::online(reading),
            FetchOutcome::NoData => DashboardView {
                connection: Connection::Offline,
                timestamp_label: "No readings yet".to_owned(),
                status_message: "Waiting for first reading from station...".to_owned(),
                gauges: gauge::error_gauges(),
            },
            FetchOutcome::Failed(msg) => DashboardView {
                connection: Connection::Offline,
                timestamp_label: "Connection Failed".to_owned(),
                status_message: format!("Error: {}", msg),
                gauges: gauge::error_gauges(),
            },
        }
    }
}

/// Poll period from an explicit override, `configured` is only consulted without one
pub fn poll_period<F>(poll_ms: Option<u64>, configured: F) -> Duration
where
    F: FnOnce() -> u64,
{
    Duration::from_millis(poll_ms.unwrap_or_else(configured).max(1))
}

/// Operator input to a running poller
#[derive(Debug)]
pub enum DashboardAction {
    /// Queue a test run, the reply carries the message for the operator
    StartTest(oneshot::Sender<String>),
}

pub struct DashboardPoller {
    client: DashboardClient,
    station_id: Option<i32>,
    period: Duration,
}

/// Handle to a spawned poller, dropping it stops the poll loop
pub struct DashboardHandle {
    pub view: watch::Receiver<DashboardView>,
    actions: mpsc::Sender<DashboardAction>,
}

impl DashboardHandle {
    /// Asks the poller to queue a test run and returns the operator message
    pub async fn start_test(&self) -> String {
        let (tx, rx) = oneshot::channel();
        if self.actions.send(DashboardAction::StartTest(tx)).await.is_err() {
            return StartOutcome::ConnectionError.message();
        }
        rx.await
            .unwrap_or_else(|_| StartOutcome::ConnectionError.message())
    }
}

impl DashboardPoller {
    pub fn new(client: DashboardClient, station_id: Option<i32>, period: Duration) -> Self {
        DashboardPoller {
            client,
            station_id,
            period,
        }
    }

    pub fn spawn(self) -> DashboardHandle {
        let (view_tx, view_rx) = watch::channel(DashboardView::unselected());
        let (action_tx, action_rx) = mpsc::channel(8);
        tokio::spawn(self.run(view_tx, action_rx));
        DashboardHandle {
            view: view_rx,
            actions: action_tx,
        }
    }

    /// Polls until every action sender is gone
    pub async fn run(
        self,
        view_tx: watch::Sender<DashboardView>,
        mut actions: mpsc::Receiver<DashboardAction>,
    ) {
        let Some(station_id) = self.station_id else {
            info!("No station selected");
            view_tx.send_replace(DashboardView::unselected());
            while let Some(action) = actions.recv().await {
                let DashboardAction::StartTest(reply) = action;
                let _ = reply.send("Please select a station first.".to_owned());
            }
            return;
        };

        info!(
            station_id = station_id,
            "Polling {} every {:?}",
            self.client.base_url(),
            self.period
        );
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.refresh(station_id, &view_tx).await;
                }
                action = actions.recv() => match action {
                    Some(DashboardAction::StartTest(reply)) => {
                        let outcome = self.client.start_test(station_id).await;
                        info!(station_id = station_id, "Start test: {:?}", outcome);
                        let _ = reply.send(outcome.message());
                        if outcome.answered() {
                            self.refresh(station_id, &view_tx).await;
                        }
                    }
                    None => break,
                },
            }
        }
        debug!(station_id = station_id, "Poller stopped");
    }

    async fn refresh(&self, station_id: i32, view_tx: &watch::Sender<DashboardView>) {
        let outcome = self.client.fetch_latest(station_id).await;
        view_tx.send_replace(DashboardView::from_outcome(&outcome));
    }
}

#[cfg(test)]
mod test;
