use super::dto::MessageResponseDto;
use super::query::{station_query, StationQuery};
use super::{build_response, json_reply};
use crate::error::{ApiError, ObserverError};
use crate::station::StationObserver;
use std::sync::Arc;
use tracing::warn;
use warp::http::{Method, StatusCode};
use warp::Filter;

pub fn routes(
    observer: &Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    get_command(observer.clone()).or(start_test(observer.clone()))
}

/// GET api/get-command?station_id=:id
///
/// Polled by the station device
///
/// Returns the pending command of the station, which is completed by this
/// call, or `NONE`. Storage failures also answer `NONE`.
#[utoipa::path(
    get,
    path = "/api/get-command",
    tag = "command",
    params(StationQuery),
    responses(
        (status = 200, description = "Pending command or NONE", body = dto::CommandResponseDto),
        (status = 400, description = "Missing station_id", body = dto::CommandResponseDto)
    )
)]
pub fn get_command(
    observer: Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "get-command"))
        .and(warp::get())
        .and(station_query())
        .and_then(
            |observer: Arc<StationObserver>, query: StationQuery| async move {
                let reply = match query.station_id() {
                    Ok(station_id) => {
                        let command = observer.poll_command(station_id).await;
                        json_reply(&dto::CommandResponseDto::from(command), StatusCode::OK)
                    }
                    Err(e) => {
                        warn!("{}", e);
                        json_reply(
                            &dto::CommandResponseDto::rejected(e.to_string()),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                };
                Ok::<_, warp::Rejection>(reply)
            },
        )
        .boxed()
}

/// POST api/start-test?station_id=:id
///
/// Queue a test run for a station
///
/// Returns 200 once the command is stored, a previously queued and not yet
/// delivered command is replaced
#[utoipa::path(
    post,
    path = "/api/start-test",
    tag = "command",
    params(StationQuery),
    responses(
        (status = 200, description = "Command queued", body = super::dto::MessageResponseDto),
        (status = 400, description = "Missing station_id", body = super::dto::ErrorResponseDto),
        (status = 405, description = "Not a POST request", body = super::dto::ErrorResponseDto),
        (status = 500, description = "Storage failure", body = super::dto::ErrorResponseDto)
    )
)]
pub fn start_test(
    observer: Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "start-test"))
        .and(warp::method())
        .and(station_query())
        .and_then(
            |observer: Arc<StationObserver>, method: Method, query: StationQuery| async move {
                let resp = queue_test(&observer, method, query).await;
                build_response(resp)
            },
        )
        .boxed()
}

async fn queue_test(
    observer: &StationObserver,
    method: Method,
    query: StationQuery,
) -> Result<MessageResponseDto, ObserverError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed.into());
    }
    let station_id = query.station_id()?;
    observer.start_test(station_id).await?;
    Ok(MessageResponseDto::new("Test command queued for station"))
}

///
/// DTO
///
pub mod dto {
    use aquapoll_core::{StationCommand, NO_COMMAND};
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct CommandResponseDto {
        /// Command name, `NONE` if there is nothing to do
        pub command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub error: Option<String>,
    }

    impl CommandResponseDto {
        pub fn rejected(error: String) -> Self {
            CommandResponseDto {
                command: NO_COMMAND.to_owned(),
                error: Some(error),
            }
        }
    }

    impl From<Option<StationCommand>> for CommandResponseDto {
        fn from(command: Option<StationCommand>) -> Self {
            CommandResponseDto {
                command: command
                    .map(|c| c.as_str())
                    .unwrap_or(NO_COMMAND)
                    .to_owned(),
                error: None,
            }
        }
    }
}
