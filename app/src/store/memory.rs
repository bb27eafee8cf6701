use super::StationStore;
use crate::error::DBError;
use aquapoll_core::{CommandRecord, ReadingMessage, StationCommand};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-local store, used when no database is configured and in tests.
/// Each operation holds the lock for its whole read-modify-write.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    commands: HashMap<i32, CommandRecord>,
    readings: HashMap<i32, Vec<ReadingMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StationStore for MemoryStore {
    async fn enqueue_command(
        &self,
        station_id: i32,
        command: StationCommand,
    ) -> Result<(), DBError> {
        let now = Utc::now();
        let mut inner = self.inner.lock();
        inner
            .commands
            .entry(station_id)
            .and_modify(|record| record.replace(command, now))
            .or_insert_with(|| CommandRecord::pending(station_id, command, now));
        Ok(())
    }

    async fn claim_command(&self, station_id: i32) -> Result<Option<StationCommand>, DBError> {
        let mut inner = self.inner.lock();
        Ok(inner
            .commands
            .get_mut(&station_id)
            .and_then(|record| record.claim(Utc::now())))
    }

    async fn command(&self, station_id: i32) -> Result<Option<CommandRecord>, DBError> {
        Ok(self.inner.lock().commands.get(&station_id).cloned())
    }

    async fn insert_reading(
        &self,
        station_id: i32,
        reading: &ReadingMessage,
    ) -> Result<(), DBError> {
        self.inner
            .lock()
            .readings
            .entry(station_id)
            .or_default()
            .push(reading.clone());
        Ok(())
    }

    async fn latest_reading(&self, station_id: i32) -> Result<Option<ReadingMessage>, DBError> {
        let inner = self.inner.lock();
        Ok(inner
            .readings
            .get(&station_id)
            .and_then(|readings| readings.iter().max_by_key(|r| r.timestamp))
            .cloned())
    }

    async fn check(&self) -> Result<(), DBError> {
        Ok(())
    }
}
