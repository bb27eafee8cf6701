use super::build_response;
use super::dto::MessageResponseDto;
use super::query::{station_query, StationQuery};
use super::JSON_BODY_LIMIT;
use crate::error::ObserverError;
use crate::station::StationObserver;
use aquapoll_core::StationReading;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    latest_readings(observer.clone()).or(push_reading(observer.clone()))
}

/// GET api/get-latest-readings?station_id=:id
///
/// Fetch the newest reading of a station
///
/// Returns a `LatestReadingDto`, or 404 if the station never reported
#[utoipa::path(
    get,
    path = "/api/get-latest-readings",
    tag = "reading",
    params(StationQuery),
    responses(
        (status = 200, description = "Newest reading", body = dto::LatestReadingDto),
        (status = 400, description = "Missing station_id", body = super::dto::ErrorResponseDto),
        (status = 404, description = "No readings yet", body = super::dto::ErrorResponseDto),
        (status = 500, description = "Storage failure", body = super::dto::ErrorResponseDto)
    )
)]
pub fn latest_readings(
    observer: Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "get-latest-readings"))
        .and(warp::get())
        .and(station_query())
        .and_then(
            |observer: Arc<StationObserver>, query: StationQuery| async move {
                let resp = match query.station_id() {
                    Ok(station_id) => observer
                        .latest_reading(station_id)
                        .await
                        .map(dto::LatestReadingDto::from),
                    Err(e) => Err(ObserverError::from(e)),
                };
                build_response(resp)
            },
        )
        .boxed()
}

/// POST api/readings
///
/// Store a reading pushed by a station
///
/// Returns 200 once the reading is persisted
#[utoipa::path(
    post,
    path = "/api/readings",
    tag = "reading",
    request_body = StationReading,
    responses(
        (status = 200, description = "Reading stored", body = super::dto::MessageResponseDto),
        (status = 400, description = "Invalid reading", body = super::dto::ErrorResponseDto),
        (status = 500, description = "Storage failure", body = super::dto::ErrorResponseDto)
    )
)]
pub fn push_reading(
    observer: Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "readings"))
        .and(warp::post())
        .and(warp::body::content_length_limit(JSON_BODY_LIMIT))
        .and(warp::body::json())
        .and_then(
            |observer: Arc<StationObserver>, body: StationReading| async move {
                let resp = observer
                    .push_reading(body)
                    .await
                    .map(|_| MessageResponseDto::new("Reading stored"));
                build_response(resp)
            },
        )
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use aquapoll_core::ReadingMessage;
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct LatestReadingDto {
        pub success: bool,
        #[serde(flatten)]
        pub reading: ReadingMessage,
    }

    impl From<ReadingMessage> for LatestReadingDto {
        fn from(reading: ReadingMessage) -> Self {
            LatestReadingDto {
                success: true,
                reading,
            }
        }
    }

    /// Any reply of the latest-readings endpoint, as seen by a client
    #[derive(Debug, Deserialize)]
    pub struct ReadingReplyDto {
        pub success: bool,
        #[serde(default)]
        pub error: Option<String>,
        #[serde(flatten)]
        pub reading: Option<ReadingMessage>,
    }
}
