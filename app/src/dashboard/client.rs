use crate::rest::reading_dto::ReadingReplyDto;
use aquapoll_core::ReadingMessage;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one latest-readings request
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Reading(ReadingMessage),
    /// The station never reported
    NoData,
    Failed(String),
}

/// Result of one start-test request
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Queued,
    /// The server answered but did not queue the command
    Rejected(Option<String>),
    ConnectionError,
}

impl StartOutcome {
    /// Text shown to the operator
    pub fn message(&self) -> String {
        match self {
            StartOutcome::Queued => {
                "Test command sent! Station will start test on next poll.".to_owned()
            }
            StartOutcome::Rejected(Some(message)) => message.clone(),
            StartOutcome::Rejected(None) => "Failed to queue test command.".to_owned(),
            StartOutcome::ConnectionError => {
                "Connection error: Could not send command to server.".to_owned()
            }
        }
    }

    /// Whether the server answered, so the readings are worth refreshing
    pub fn answered(&self) -> bool {
        !matches!(self, StartOutcome::ConnectionError)
    }
}

#[derive(Debug, Deserialize)]
struct StartReplyDto {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client of the dashboard against one server
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(format!("aquapoll-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(DashboardClient {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_latest(&self, station_id: i32) -> FetchOutcome {
        let url = format!("{}/api/get-latest-readings", self.base_url);
        let resp = match self
            .client
            .get(&url)
            .query(&[("station_id", station_id)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(station_id = station_id, "Fetch readings failed: {}", e);
                return FetchOutcome::Failed(e.to_string());
            }
        };

        match resp.status() {
            StatusCode::OK => match resp.json::<ReadingReplyDto>().await {
                Ok(ReadingReplyDto {
                    success: true,
                    reading: Some(reading),
                    ..
                }) => FetchOutcome::Reading(reading),
                Ok(reply) => {
                    FetchOutcome::Failed(reply.error.unwrap_or_else(|| "Unknown error".to_owned()))
                }
                Err(e) => FetchOutcome::Failed(e.to_string()),
            },
            StatusCode::NOT_FOUND => {
                debug!(station_id = station_id, "No readings yet");
                FetchOutcome::NoData
            }
            status => FetchOutcome::Failed(format!("HTTP Status Error: {}", status.as_u16())),
        }
    }

    pub async fn start_test(&self, station_id: i32) -> StartOutcome {
        let url = format!("{}/api/start-test", self.base_url);
        let resp = match self
            .client
            .post(&url)
            .query(&[("station_id", station_id)])
            .send()
            .await
        {
            Ok(resp) if resp.status() == StatusCode::OK => resp,
            Ok(resp) => {
                warn!(station_id = station_id, "Start test answered {}", resp.status());
                return StartOutcome::ConnectionError;
            }
            Err(e) => {
                warn!(station_id = station_id, "Start test failed: {}", e);
                return StartOutcome::ConnectionError;
            }
        };

        match resp.json::<StartReplyDto>().await {
            Ok(reply) if reply.success => StartOutcome::Queued,
            Ok(reply) => StartOutcome::Rejected(reply.message),
            Err(e) => {
                warn!(station_id = station_id, "Invalid start test reply: {}", e);
                StartOutcome::ConnectionError
            }
        }
    }
}
