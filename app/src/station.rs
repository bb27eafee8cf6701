use crate::error::{ApiError, ObserverError};
use crate::store::StationStore;
use aquapoll_core::{ReadingMessage, StationCommand, StationReading};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, error, info};

const MAX_STATUS_LEN: usize = 32;
const MAX_RESULT_LEN: usize = 64;

/// Entry point of the HTTP layer into the command queue and the reading log
pub struct StationObserver {
    store: Arc<dyn StationStore>,
}

impl Debug for StationObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationObserver").finish()
    }
}

impl StationObserver {
    pub fn new(store: Arc<dyn StationStore>) -> Arc<Self> {
        Arc::new(StationObserver { store })
    }

    pub fn store(&self) -> &Arc<dyn StationStore> {
        &self.store
    }

    /// Queues a test run for the station, replacing any command it has not fetched yet
    #[tracing::instrument(skip(self))]
    pub async fn start_test(&self, station_id: i32) -> Result<(), ObserverError> {
        self.store
            .enqueue_command(station_id, StationCommand::StartTest)
            .await
            .map_err(|e| ObserverError::Internal("Failed to queue command", e))?;
        info!(station_id = station_id, "Queued test command");
        Ok(())
    }

    /// Hands out the pending command of a station exactly once.
    ///
    /// Storage failures read as "no command", a polling device can only act
    /// on a command name and retries on its next poll anyway.
    #[tracing::instrument(skip(self))]
    pub async fn poll_command(&self, station_id: i32) -> Option<StationCommand> {
        match self.store.claim_command(station_id).await {
            Ok(Some(command)) => {
                info!(station_id = station_id, "Delivered command {}", command);
                Some(command)
            }
            Ok(None) => {
                debug!(station_id = station_id, "No pending command");
                None
            }
            Err(e) => {
                error!(station_id = station_id, "Failed claiming command: {}", e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn latest_reading(&self, station_id: i32) -> Result<ReadingMessage, ObserverError> {
        let reading = self
            .store
            .latest_reading(station_id)
            .await
            .map_err(|e| ObserverError::Internal("Database error", e))?;
        reading.ok_or(ObserverError::NotFound(station_id))
    }

    #[tracing::instrument(skip(self, pushed), fields(station_id = pushed.station_id))]
    pub async fn push_reading(&self, pushed: StationReading) -> Result<(), ObserverError> {
        validate_reading(&pushed)?;
        self.store
            .insert_reading(pushed.station_id, &pushed.reading)
            .await
            .map_err(|e| ObserverError::Internal("Failed to store reading", e))?;
        debug!("Stored reading");
        Ok(())
    }

    pub async fn check_db(&self) -> String {
        match self.store.check().await {
            Ok(_) => "ok".to_owned(),
            Err(e) => {
                error!("Database check failed: {}", e);
                e.to_string()
            }
        }
    }
}

fn validate_reading(pushed: &StationReading) -> Result<(), ApiError> {
    if pushed.station_id <= 0 {
        return Err(ApiError::MissingStationId);
    }

    let reading = &pushed.reading;
    if let Some(kind) = reading.non_finite_metric() {
        return Err(ApiError::InvalidReading(format!(
            "{} value is not a number",
            kind.name()
        )));
    }
    for kind in aquapoll_core::MetricKind::ALL {
        if reading.metric(kind).status.chars().count() > MAX_STATUS_LEN {
            return Err(ApiError::InvalidReading(format!(
                "{} status exceeds {} characters",
                kind.name(),
                MAX_STATUS_LEN
            )));
        }
    }
    if reading.color_result.chars().count() > MAX_RESULT_LEN {
        return Err(ApiError::InvalidReading(format!(
            "color result exceeds {} characters",
            MAX_RESULT_LEN
        )));
    }
    Ok(())
}
