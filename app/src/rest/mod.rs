use crate::error::{ApiError, ObserverError};
use crate::station::StationObserver;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

mod command_routes;
mod doc_routes;
mod metric_routes;
mod query;
mod reading_routes;

pub use command_routes::dto as command_dto;
pub use query::StationQuery;
pub use reading_routes::dto as reading_dto;

const JSON_BODY_LIMIT: u64 = 4096;

pub fn routes(
    observer: &Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    command_routes::routes(observer)
        .or(reading_routes::routes(observer))
        .or(metric_routes::routes(observer))
        .or(doc_routes::routes())
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}

/// Serves until `shutdown` resolves
pub async fn dispatch_server(
    observer: Arc<StationObserver>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), warp::Error> {
    let (bound, server) =
        warp::serve(routes(&observer)).try_bind_with_graceful_shutdown(addr, shutdown)?;
    info!("Starting webserver at: {}", bound);
    server.await;
    info!("Webserver stopped");
    Ok(())
}

pub(crate) fn json_reply<T>(data: &T, status: StatusCode) -> warp::reply::Response
where
    T: serde::Serialize,
{
    warp::reply::with_status(warp::reply::json(data), status).into_response()
}

fn build_response<T: serde::Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<warp::reply::Response, Rejection> {
    match resp {
        Ok(data) => Ok(json_reply(&data, StatusCode::OK)),
        Err(err) => {
            let status = match &err {
                ObserverError::User(ApiError::MethodNotAllowed) => StatusCode::METHOD_NOT_ALLOWED,
                ObserverError::User(_) => StatusCode::BAD_REQUEST,
                ObserverError::NotFound(_) => StatusCode::NOT_FOUND,
                ObserverError::Internal(_, source) => {
                    error!("{}: {}", err, source);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            if status.is_client_error() {
                warn!("{}", err);
            }
            Ok(json_reply(&dto::ErrorResponseDto::new(err.to_string()), status))
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_owned())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid body: {}", e))
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, ApiError::MissingStationId.to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_owned())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_owned())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected application/json".to_owned(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_owned(),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_owned(),
        )
    };
    Ok(json_reply(&dto::ErrorResponseDto::new(message), status))
}

///
/// DTO
///
pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct ErrorResponseDto {
        pub success: bool,
        pub error: String,
    }

    impl ErrorResponseDto {
        pub fn new(error: String) -> Self {
            ErrorResponseDto {
                success: false,
                error,
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct MessageResponseDto {
        pub success: bool,
        pub message: String,
    }

    impl MessageResponseDto {
        pub fn new(message: &str) -> Self {
            MessageResponseDto {
                success: true,
                message: message.to_owned(),
            }
        }
    }
}
