use crate::error::ApiError;
use std::convert::Infallible;
use utoipa::IntoParams;
use warp::Filter;

const STATION_ID_KEY: &str = "station_id";

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationQuery {
    /// Positive station identifier
    #[param(value_type = i32)]
    station_id: Option<String>,
}

impl StationQuery {
    pub fn new(station_id: impl Into<String>) -> Self {
        StationQuery {
            station_id: Some(station_id.into()),
        }
    }

    /// A repeated `station_id` is ambiguous and counts as missing
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut ids = pairs
            .into_iter()
            .filter(|(key, _)| key == STATION_ID_KEY)
            .map(|(_, value)| value);
        let station_id = match (ids.next(), ids.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        };
        StationQuery { station_id }
    }

    /// Absent, blank, non numeric and non positive ids all count as missing
    pub fn station_id(&self) -> Result<i32, ApiError> {
        self.station_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or(ApiError::MissingStationId)
    }
}

/// Extracts the station query without rejecting, so every route answers
/// a malformed query in its own body shape
pub fn station_query() -> impl Filter<Extract = (StationQuery,), Error = Infallible> + Clone {
    warp::query::<Vec<(String, String)>>()
        .or(warp::any().map(Vec::new))
        .unify()
        .map(StationQuery::from_pairs)
}
