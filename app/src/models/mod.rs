use crate::config::CONFIG;
use crate::error::DBError;
use std::time::Duration;
use tracing::info;

/// Runtime-checked statements, so the crate builds without a live database
macro_rules! sql_stmnt {
    ($ret:ident, $stmt:expr) => {
        sqlx::query_as::<_ ,$ret>($stmt)
    };
    ($stmt:expr) => {
        sqlx::query($stmt)
    };
    ($ret:ident, $stmt:expr, $($bind:expr),*) => {
        sqlx::query_as::<_ ,$ret>($stmt)$(.bind($bind))*
    };
    ($stmt:expr, $($bind:expr),*) => {
        sqlx::query($stmt)$(.bind($bind))*
    };
}

pub async fn connect(database_url: &str) -> Result<sqlx::PgPool, DBError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(CONFIG.db_max_connections())
        .acquire_timeout(Duration::from_millis(CONFIG.db_acquire_timeout_ms()))
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(conn: &sqlx::PgPool) -> Result<(), DBError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sql_stmnt!("SELECT 1 FROM station_commands LIMIT 1")
        .execute(conn)
        .await?;
    sql_stmnt!("SELECT 1 FROM waterdata LIMIT 1")
        .execute(conn)
        .await?;
    Ok(())
}

pub mod reading;
pub mod station_command;

#[cfg(test)]
mod test;
