use super::{command_routes, metric_routes, reading_routes};
use utoipa::OpenApi;
use warp::Filter;

#[derive(OpenApi)]
#[openapi(
    paths(
        command_routes::get_command,
        command_routes::start_test,
        reading_routes::latest_readings,
        reading_routes::push_reading,
        metric_routes::health
    ),
    components(schemas(
        command_routes::dto::CommandResponseDto,
        reading_routes::dto::LatestReadingDto,
        metric_routes::dto::HealthyDto,
        super::dto::ErrorResponseDto,
        super::dto::MessageResponseDto,
        aquapoll_core::ReadingMessage,
        aquapoll_core::StationReading
    )),
    tags(
        (name = "command", description = "Station command queue"),
        (name = "reading", description = "Station readings"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// GET api/doc/api.json
pub fn routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = ApiDoc::openapi();
    warp::path!("api" / "doc" / "api.json")
        .and(warp::get())
        .map(move || warp::reply::json(&api))
        .boxed()
}
