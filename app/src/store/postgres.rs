use super::StationStore;
use crate::error::DBError;
use crate::models::{self, reading as reading_model, station_command as command_model};
use aquapoll_core::{CommandRecord, ReadingMessage, StationCommand};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgStore {
    conn: PgPool,
}

impl PgStore {
    pub fn new(conn: PgPool) -> Self {
        PgStore { conn }
    }
}

#[async_trait]
impl StationStore for PgStore {
    async fn enqueue_command(
        &self,
        station_id: i32,
        command: StationCommand,
    ) -> Result<(), DBError> {
        command_model::upsert(&self.conn, station_id, command).await
    }

    async fn claim_command(&self, station_id: i32) -> Result<Option<StationCommand>, DBError> {
        command_model::claim_pending(&self.conn, station_id).await
    }

    async fn command(&self, station_id: i32) -> Result<Option<CommandRecord>, DBError> {
        command_model::get(&self.conn, station_id).await
    }

    async fn insert_reading(
        &self,
        station_id: i32,
        reading: &ReadingMessage,
    ) -> Result<(), DBError> {
        reading_model::insert(&self.conn, station_id, reading).await
    }

    async fn latest_reading(&self, station_id: i32) -> Result<Option<ReadingMessage>, DBError> {
        let dao = reading_model::get_latest(&self.conn, station_id).await?;
        Ok(dao.map(ReadingMessage::from))
    }

    async fn check(&self) -> Result<(), DBError> {
        models::check_schema(&self.conn).await
    }
}
