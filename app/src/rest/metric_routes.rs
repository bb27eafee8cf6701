use super::build_response;
use crate::error::ObserverError;
use crate::station::StationObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(observer.clone())
}

/// GET api/health
///
/// Liveness of the service and reachability of its store
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = dto::HealthyDto)
    )
)]
pub fn health(
    observer: Arc<StationObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "health"))
        .and(warp::get())
        .and_then(|observer: Arc<StationObserver>| async move {
            let ret = dto::HealthyDto {
                healthy: true,
                database_state: observer.check_db().await,
                version: aquapoll_core::CORE_VERSION.to_owned(),
            };
            build_response(Ok::<_, ObserverError>(ret))
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub database_state: String,
        pub version: String,
    }
}
