use aquapoll_core::error::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, std::string::String),
}

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Invalid row: {0}")]
    InvalidRow(#[from] ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Missing station_id parameter")]
    MissingStationId,
    #[error("Invalid reading: {0}")]
    InvalidReading(std::string::String),
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,
}

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error(transparent)]
    User(#[from] ApiError),
    #[error("No readings found for this station")]
    NotFound(i32),
    #[error("{0}")]
    Internal(&'static str, #[source] DBError),
}
