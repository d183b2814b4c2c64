//! Seoul open-data API client for the walking trail dataset
//!
//! Fetches the `walkSesonInfo` dataset and parses it into typed
//! [`TrailRecord`] rows, plus the filter predicate used to pick a course
//! for a [`Selection`].

use std::fmt;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::{Selection, TrailRecord};

/// Base URL for the Seoul open-data API
pub const DEFAULT_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// Dataset (service) name of the walking trail information
const SERVICE_NAME: &str = "walkSesonInfo";

/// First row index requested (the API is 1-based)
const START_INDEX: u32 = 1;

/// Number of rows requested per query
pub const PAGE_SIZE: u32 = 100;

/// Content type the API must answer with
const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors that can occur when fetching trail data
#[derive(Debug, Error)]
pub enum TrailError {
    /// The request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// The server did not answer with JSON
    #[error("Server did not return JSON (content type: {})", .0.as_deref().unwrap_or("none"))]
    ContentType(Option<String>),

    /// The body is not valid JSON or a row has the wrong shape
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API reported an error instead of returning the dataset
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// The body is JSON but carries neither the dataset nor an error
    #[error("API response does not contain walkSesonInfo")]
    MissingDataset,
}

/// Top-level response body
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(rename = "walkSesonInfo")]
    dataset: Option<Dataset>,
    /// Present instead of the dataset when the request is rejected
    #[serde(rename = "RESULT")]
    result: Option<ApiResult>,
}

/// The dataset object wrapping the rows
#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    list_total_count: Option<u64>,
    row: Vec<TrailRecord>,
}

/// Status block used by the Seoul API
#[derive(Debug, Deserialize)]
struct ApiResult {
    #[serde(rename = "CODE")]
    code: String,
    #[serde(rename = "MESSAGE")]
    message: String,
}

/// Client for fetching walking trails from the Seoul open-data API
#[derive(Clone)]
pub struct TrailsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    /// Access key issued by the open-data portal
    api_key: String,
}

impl fmt::Debug for TrailsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrailsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TrailsClient {
    /// Creates a client against the public Seoul endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the dataset page requested by every query
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}/json/{}/{}/{}/",
            self.base_url, self.api_key, SERVICE_NAME, START_INDEX, PAGE_SIZE
        )
    }

    /// Fetches the first page of the dataset
    ///
    /// # Returns
    /// * `Ok(Vec<TrailRecord>)` - Rows in payload order (possibly empty)
    /// * `Err(TrailError)` - On transport failure, non-success status,
    ///   non-JSON content type, or a malformed payload
    pub async fn fetch_rows(&self) -> Result<Vec<TrailRecord>, TrailError> {
        debug!(base_url = %self.base_url, page_size = PAGE_SIZE, "requesting trail dataset");

        let response = self.http_client.get(self.endpoint_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrailError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        check_content_type(content_type.as_deref())?;

        let body = response.text().await?;
        parse_payload(&body)
    }
}

/// Accepts any content type that mentions `application/json`
fn check_content_type(content_type: Option<&str>) -> Result<(), TrailError> {
    match content_type {
        Some(value) if value.to_ascii_lowercase().contains(JSON_CONTENT_TYPE) => Ok(()),
        other => Err(TrailError::ContentType(other.map(str::to_string))),
    }
}

/// Parses a response body into dataset rows
pub fn parse_payload(body: &str) -> Result<Vec<TrailRecord>, TrailError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;

    match (envelope.dataset, envelope.result) {
        (Some(dataset), _) => {
            debug!(
                total = dataset.list_total_count,
                received = dataset.row.len(),
                "parsed trail dataset"
            );
            Ok(dataset.row)
        }
        (None, Some(result)) => Err(TrailError::Api {
            code: result.code,
            message: result.message,
        }),
        (None, None) => Err(TrailError::MissingDataset),
    }
}

/// Whether a row satisfies the selection
///
/// The level must equal the row's `COURSE_LEVEL` exactly, while the
/// district only has to appear somewhere inside the comma-joined `AREA_GU`.
pub fn matches(record: &TrailRecord, selection: &Selection) -> bool {
    record.level == selection.level.as_str() && record.districts.contains(selection.district())
}

/// Returns the first row, in payload order, that satisfies the selection
pub fn find_first_match<'a>(
    rows: &'a [TrailRecord],
    selection: &Selection,
) -> Option<&'a TrailRecord> {
    rows.iter().find(|record| matches(record, selection))
}

/// One-shot HTTP server used by the async tests
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Builds a raw HTTP/1.1 response
    pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        )
    }

    /// Serves `response` to the first connection and returns the base URL
    pub async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    /// A base URL nothing is listening on
    pub async fn closed_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        drop(listener);
        format!("http://{}", addr)
    }

    /// Two-row payload used across tests
    pub const SCENARIO_PAYLOAD: &str = r#"{
        "walkSesonInfo": {
            "list_total_count": 2,
            "RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다"},
            "row": [
                {
                    "COURSE_NAME": "정동길",
                    "COURSE_LEVEL": "중급",
                    "AREA_GU": "중구",
                    "LEAD_TIME": "1시간",
                    "DETAIL_COURSE": "시청 ~ 정동극장"
                },
                {
                    "COURSE_NAME": "청계천길",
                    "COURSE_LEVEL": "초급",
                    "AREA_GU": "중구,종로구",
                    "LEAD_TIME": "2시간",
                    "DETAIL_COURSE": "청계광장 ~ 고산자교"
                }
            ]
        }
    }"#;
}
