use aquapoll_core::{CommandStatus, ReadingMessage, StationCommand};
use chrono::{TimeZone, Utc};

use super::reading;
use super::station_command;
use super::*;

// Station ids far above anything a real deployment hands out
fn test_station_id() -> i32 {
    1_000_000 + Utc::now().timestamp_subsec_nanos() as i32
}

/// `None` if no database is configured or it is unreachable
async fn establish_db_connection() -> Option<sqlx::PgPool> {
    let database_url = CONFIG.database_url()?;
    match connect(database_url).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::error!("Failed connecting to database: {}", e);
            None
        }
    }
}

async fn test_connection() -> Option<sqlx::PgPool> {
    let conn = establish_db_connection().await?;
    run_migrations(&conn).await.unwrap();
    Some(conn)
}

async fn cleanup(conn: &sqlx::PgPool, station_id: i32) {
    sql_stmnt!("DELETE FROM waterdata WHERE station_id = $1", station_id)
        .execute(conn)
        .await
        .unwrap();
    sql_stmnt!(
        "DELETE FROM station_commands WHERE station_id = $1",
        station_id
    )
    .execute(conn)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_db_connection() {
    if let Some(conn) = test_connection().await {
        check_schema(&conn).await.unwrap();
    }
}

#[tokio::test]
async fn crud_station_commands() {
    let Some(conn) = test_connection().await else {
        return;
    };
    let station_id = test_station_id();

    // create
    station_command::upsert(&conn, station_id, StationCommand::StartTest)
        .await
        .unwrap();
    let record = station_command::get(&conn, station_id).await.unwrap().unwrap();
    assert_eq!(CommandStatus::Pending, record.status);
    assert_eq!(None, record.executed_at);

    // claim
    let claimed = station_command::claim_pending(&conn, station_id).await.unwrap();
    assert_eq!(Some(StationCommand::StartTest), claimed);
    let claimed = station_command::claim_pending(&conn, station_id).await.unwrap();
    assert_eq!(None, claimed);

    let record = station_command::get(&conn, station_id).await.unwrap().unwrap();
    assert_eq!(CommandStatus::Completed, record.status);
    assert!(record.executed_at.is_some());

    // upsert resets the slot
    station_command::upsert(&conn, station_id, StationCommand::StartTest)
        .await
        .unwrap();
    let row_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM station_commands WHERE station_id = $1")
            .bind(station_id)
            .fetch_one(&conn)
            .await
            .unwrap();
    assert_eq!(1, row_count.0);
    let record = station_command::get(&conn, station_id).await.unwrap().unwrap();
    assert_eq!(CommandStatus::Pending, record.status);
    assert_eq!(None, record.executed_at);

    cleanup(&conn, station_id).await;
}

#[tokio::test]
async fn concurrent_claims_deliver_once() {
    let Some(conn) = test_connection().await else {
        return;
    };
    let station_id = test_station_id();
    station_command::upsert(&conn, station_id, StationCommand::StartTest)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let conn = conn.clone();
        handles.push(tokio::spawn(async move {
            station_command::claim_pending(&conn, station_id).await.unwrap()
        }));
    }

    let mut delivered = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            delivered += 1;
        }
    }
    assert_eq!(1, delivered);

    cleanup(&conn, station_id).await;
}

#[tokio::test]
async fn crud_readings() {
    let Some(conn) = test_connection().await else {
        return;
    };
    let station_id = test_station_id();
    assert!(reading::get_latest(&conn, station_id).await.unwrap().is_none());

    // inserted out of order
    for (hour, tds) in [(10, 100.0), (12, 300.0), (11, 200.0)] {
        let dto = ReadingMessage {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            tds_value: tds,
            tds_status: "safe".to_owned(),
            color_result: "Clear".to_owned(),
            ..Default::default()
        };
        reading::insert(&conn, station_id, &dto).await.unwrap();
    }

    let latest: ReadingMessage = reading::get_latest(&conn, station_id)
        .await
        .unwrap()
        .unwrap()
        .into();
    assert_eq!(300.0, latest.tds_value);
    assert_eq!("Clear", latest.color_result);
    assert_eq!(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        latest.timestamp
    );

    cleanup(&conn, station_id).await;
}
