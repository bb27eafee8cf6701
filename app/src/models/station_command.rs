use aquapoll_core::{CommandRecord, StationCommand};
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::DBError;

#[derive(sqlx::FromRow)]
pub struct StationCommandDao {
    pub(crate) station_id: i32,
    pub(crate) command: std::string::String,
    pub(crate) status: std::string::String,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) executed_at: Option<NaiveDateTime>,
}

impl TryFrom<StationCommandDao> for CommandRecord {
    type Error = DBError;

    fn try_from(val: StationCommandDao) -> Result<Self, Self::Error> {
        Ok(CommandRecord {
            station_id: val.station_id,
            command: val.command.parse()?,
            status: val.status.parse()?,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(val.created_at, Utc),
            executed_at: val
                .executed_at
                .map(|t| DateTime::<Utc>::from_naive_utc_and_offset(t, Utc)),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClaimedDao {
    command: std::string::String,
}

/// Queues `command` for the station, replacing whatever occupied its slot
pub async fn upsert(
    conn: &sqlx::PgPool,
    station_id: i32,
    command: StationCommand,
) -> Result<(), DBError> {
    let now = Utc::now().naive_utc();
    sql_stmnt!(
        r#"INSERT INTO station_commands (station_id, command, status, created_at, executed_at)
            VALUES ($1, $2, 'pending', $3, NULL)
            ON CONFLICT (station_id) DO UPDATE
            SET command = EXCLUDED.command,
                status = 'pending',
                created_at = EXCLUDED.created_at,
                executed_at = NULL"#,
        station_id,
        command.as_str(),
        now
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// Completes the pending command of a station in a single statement.
/// Concurrent callers race on the row lock, only one of them gets the command.
pub async fn claim_pending(
    conn: &sqlx::PgPool,
    station_id: i32,
) -> Result<Option<StationCommand>, DBError> {
    let now = Utc::now().naive_utc();
    let claimed = sql_stmnt!(
        ClaimedDao,
        r#"UPDATE station_commands
            SET status = 'completed', executed_at = $2
            WHERE station_id = $1 AND status = 'pending'
            RETURNING command"#,
        station_id,
        now
    )
    .fetch_optional(conn)
    .await?;

    match claimed {
        Some(dao) => Ok(Some(dao.command.parse()?)),
        None => Ok(None),
    }
}

// READ station_commands
pub async fn get(conn: &sqlx::PgPool, station_id: i32) -> Result<Option<CommandRecord>, DBError> {
    let dao = sql_stmnt!(
        StationCommandDao,
        r#"SELECT station_id, command, status, created_at, executed_at
            FROM station_commands
            WHERE station_id = $1"#,
        station_id
    )
    .fetch_optional(conn)
    .await?;

    dao.map(CommandRecord::try_from).transpose()
}
