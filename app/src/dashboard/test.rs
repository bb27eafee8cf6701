use super::*;
use crate::error::DBError;
use crate::rest;
use crate::station::StationObserver;
use crate::store::{MemoryStore, StationStore};
use aquapoll_core::gauge::StatusClass;
use aquapoll_core::{CommandRecord, MetricKind, StationCommand};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::net::SocketAddr;
use std::sync::Arc;

struct BrokenStore;

#[async_trait]
impl StationStore for BrokenStore {
    async fn enqueue_command(&self, _: i32, _: StationCommand) -> Result<(), DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
    async fn claim_command(&self, _: i32) -> Result<Option<StationCommand>, DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
    async fn command(&self, _: i32) -> Result<Option<CommandRecord>, DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
    async fn insert_reading(&self, _: i32, _: &ReadingMessage) -> Result<(), DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
    async fn latest_reading(&self, _: i32) -> Result<Option<ReadingMessage>, DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
    async fn check(&self) -> Result<(), DBError> {
        Err(DBError::SQLError(sqlx::Error::PoolTimedOut))
    }
}

fn sample_reading() -> ReadingMessage {
    ReadingMessage {
        tds_value: 500.0,
        tds_status: "Safe".to_owned(),
        ph_value: 7.0,
        ph_status: "neutral".to_owned(),
        turbidity_value: 12.0,
        turbidity_status: "warning".to_owned(),
        lead_value: 0.003,
        lead_status: String::new(),
        color_value: 15.0,
        color_status: "murky".to_owned(),
        color_result: String::new(),
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 5).unwrap(),
    }
}

/// Serves the routes on a random local port
fn serve(store: Arc<dyn StationStore>) -> SocketAddr {
    let observer = StationObserver::new(store);
    let (addr, server) = warp::serve(rest::routes(&observer)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn client_for(addr: SocketAddr) -> DashboardClient {
    DashboardClient::new(&format!("http://{}/", addr)).unwrap()
}

#[test]
fn test_online_view() {
    let view = DashboardView::from_outcome(&FetchOutcome::Reading(sample_reading()));

    assert_eq!(Connection::Online, view.connection);
    assert_eq!("2024-06-01 09:30:05 UTC", view.timestamp_label);
    assert_eq!("Connected to server. Data refreshing...", view.status_message);
    assert_eq!(5, view.gauges.len());

    let tds = &view.gauges[0];
    assert_eq!(MetricKind::Tds, tds.kind);
    assert_eq!("500", tds.lcd);
    assert_eq!(StatusClass::Safe, tds.class);
    assert!((tds.rotation - 0.0).abs() < 1e-9);

    let turbidity = &view.gauges[2];
    assert_eq!("12.00", turbidity.lcd);
    assert_eq!(StatusClass::Warning, turbidity.class);
    assert!((turbidity.rotation - 130.0).abs() < 1e-9);

    let lead = &view.gauges[3];
    assert_eq!("NA", lead.status);
    assert_eq!(StatusClass::Failed, lead.class);

    let color = &view.gauges[4];
    assert_eq!("15", color.lcd);
    assert!((color.rotation + 130.0).abs() < 1e-9);
}

#[test]
fn test_offline_views() {
    let view = DashboardView::from_outcome(&FetchOutcome::NoData);
    assert_eq!(Connection::Offline, view.connection);
    assert_eq!("No readings yet", view.timestamp_label);
    assert_eq!("Waiting for first reading from station...", view.status_message);

    let view = DashboardView::from_outcome(&FetchOutcome::Failed("HTTP Status Error: 500".into()));
    assert_eq!(Connection::Offline, view.connection);
    assert_eq!("Connection Failed", view.timestamp_label);
    assert_eq!("Error: HTTP Status Error: 500", view.status_message);
    for gauge in &view.gauges {
        assert_eq!("--", gauge.lcd);
        assert_eq!("Error", gauge.status);
        assert_eq!(StatusClass::Failed, gauge.class);
        assert!((gauge.rotation + 130.0).abs() < 1e-9);
    }
}

#[test]
fn test_start_outcome_messages() {
    assert_eq!(
        "Test command sent! Station will start test on next poll.",
        StartOutcome::Queued.message()
    );
    assert_eq!(
        "Failed to queue test command.",
        StartOutcome::Rejected(None).message()
    );
    assert_eq!("busy", StartOutcome::Rejected(Some("busy".into())).message());
    assert_eq!(
        "Connection error: Could not send command to server.",
        StartOutcome::ConnectionError.message()
    );
    assert!(!StartOutcome::ConnectionError.answered());
}

#[test]
fn test_poll_period_override() {
    let period = poll_period(Some(250), || panic!("configuration must not be read"));
    assert_eq!(Duration::from_millis(250), period);

    assert_eq!(Duration::from_millis(5000), poll_period(None, || 5000));
    assert_eq!(Duration::from_millis(1), poll_period(Some(0), || 5000));
}

#[tokio::test]
async fn test_client_against_server() {
    // Prepare
    let store = Arc::new(MemoryStore::new());
    let addr = serve(store.clone());
    let client = client_for(addr);

    // Execute & Validate
    assert_eq!(FetchOutcome::NoData, client.fetch_latest(11).await);

    assert_eq!(StartOutcome::Queued, client.start_test(11).await);
    let record = store.command(11).await.unwrap().unwrap();
    assert_eq!(StationCommand::StartTest, record.command);

    store.insert_reading(11, &sample_reading()).await.unwrap();
    assert_eq!(
        FetchOutcome::Reading(sample_reading()),
        client.fetch_latest(11).await
    );
}

#[tokio::test]
async fn test_client_server_failure() {
    let addr = serve(Arc::new(BrokenStore));
    let client = client_for(addr);

    assert_eq!(
        FetchOutcome::Failed("HTTP Status Error: 500".to_owned()),
        client.fetch_latest(3).await
    );
    assert_eq!(StartOutcome::ConnectionError, client.start_test(3).await);
}

#[tokio::test]
async fn test_poller_start_test_refreshes() {
    // Prepare
    let store = Arc::new(MemoryStore::new());
    store.insert_reading(5, &sample_reading()).await.unwrap();
    let addr = serve(store.clone());
    let poller = DashboardPoller::new(client_for(addr), Some(5), Duration::from_secs(3600));

    // Execute
    let mut handle = poller.spawn();
    handle.view.changed().await.unwrap();
    assert_eq!(Connection::Online, handle.view.borrow().connection);

    let message = handle.start_test().await;

    // Validate
    assert_eq!(
        "Test command sent! Station will start test on next poll.",
        message
    );
    let record = store.command(5).await.unwrap().unwrap();
    assert_eq!(StationCommand::StartTest, record.command);
    assert_eq!(
        "2024-06-01 09:30:05 UTC",
        handle.view.borrow().timestamp_label
    );
}

#[tokio::test]
async fn test_poller_without_station() {
    let addr = serve(Arc::new(MemoryStore::new()));
    let poller = DashboardPoller::new(client_for(addr), None, Duration::from_millis(10));

    let handle = poller.spawn();
    assert_eq!(
        "Please select a station first.",
        handle.start_test().await
    );
    assert_eq!(
        "Please select a refilling station to start monitoring.",
        handle.view.borrow().status_message
    );
}
