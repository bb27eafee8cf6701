use aquapoll_core::ReadingMessage;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::DBError;

#[derive(sqlx::FromRow)]
pub struct ReadingDao {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) tds_value: f64,
    pub(crate) tds_status: String,
    pub(crate) ph_value: f64,
    pub(crate) ph_status: String,
    pub(crate) turbidity_value: f64,
    pub(crate) turbidity_status: String,
    pub(crate) lead_value: f64,
    pub(crate) lead_status: String,
    pub(crate) color_value: f64,
    pub(crate) color_status: String,
    pub(crate) color_result: String,
}

impl From<ReadingDao> for ReadingMessage {
    fn from(val: ReadingDao) -> Self {
        ReadingMessage {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(val.timestamp, Utc),
            tds_value: val.tds_value,
            tds_status: val.tds_status,
            ph_value: val.ph_value,
            ph_status: val.ph_status,
            turbidity_value: val.turbidity_value,
            turbidity_status: val.turbidity_status,
            lead_value: val.lead_value,
            lead_status: val.lead_status,
            color_value: val.color_value,
            color_status: val.color_status,
            color_result: val.color_result,
        }
    }
}

pub async fn insert(
    conn: &sqlx::PgPool,
    station_id: i32,
    dto: &ReadingMessage,
) -> Result<(), DBError> {
    sql_stmnt!(
        r#"INSERT INTO waterdata
            (station_id, timestamp, tds_value, tds_status, ph_value, ph_status,
             turbidity_value, turbidity_status, lead_value, lead_status,
             color_value, color_status, color_result)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        station_id,
        dto.timestamp.naive_utc(),
        dto.tds_value,
        &dto.tds_status,
        dto.ph_value,
        &dto.ph_status,
        dto.turbidity_value,
        &dto.turbidity_status,
        dto.lead_value,
        &dto.lead_status,
        dto.color_value,
        &dto.color_status,
        &dto.color_result
    )
    .execute(conn)
    .await?;
    Ok(())
}

// READ waterdata, ties on timestamp resolve to whatever row postgres returns first
pub async fn get_latest(
    conn: &sqlx::PgPool,
    station_id: i32,
) -> Result<Option<ReadingDao>, DBError> {
    Ok(sql_stmnt!(
        ReadingDao,
        r#"SELECT timestamp, tds_value, tds_status, ph_value, ph_status,
                turbidity_value, turbidity_status, lead_value, lead_status,
                color_value, color_status, color_result
            FROM waterdata
            WHERE station_id = $1
            ORDER BY timestamp DESC
            LIMIT 1"#,
        station_id
    )
    .fetch_optional(conn)
    .await?)
}
