use crate::error::DBError;
use aquapoll_core::{CommandRecord, ReadingMessage, StationCommand};
use async_trait::async_trait;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Keyed persistence of the two station facts: one command slot and an
/// append-only reading log per station id.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Overwrites the command slot of the station with a pending `command`
    async fn enqueue_command(&self, station_id: i32, command: StationCommand)
        -> Result<(), DBError>;

    /// Atomically moves a pending command to completed and returns it.
    /// At most one caller observes a given pending command.
    async fn claim_command(&self, station_id: i32) -> Result<Option<StationCommand>, DBError>;

    async fn command(&self, station_id: i32) -> Result<Option<CommandRecord>, DBError>;

    async fn insert_reading(&self, station_id: i32, reading: &ReadingMessage)
        -> Result<(), DBError>;

    /// The reading with the greatest timestamp of the station
    async fn latest_reading(&self, station_id: i32) -> Result<Option<ReadingMessage>, DBError>;

    async fn check(&self) -> Result<(), DBError>;
}
