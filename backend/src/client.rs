//! Async client for a running server.
//!
//! ```no_run
//! # async fn run() -> Result<(), elephant_server::client::ClientError> {
//! use elephant_server::client::ElephantClient;
//! use serde_json::json;
//!
//! let client = ElephantClient::new("127.0.0.1", 5000);
//! let isi = client
//!     .call("statistics", "isi", &json!({"data": {"spiketrain": [1.0, 1.5, 4.0]}}))
//!     .await?;
//! assert_eq!(isi, json!([0.5, 2.5]));
//! # Ok(())
//! # }
//! ```

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed or the reply was not JSON.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the payload (HTTP 400).
    #[error("Bad request: {0}")]
    BadRequest(ApiError),

    /// Unknown module or function (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// Any other non-success reply, body kept verbatim.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ClientError {
    /// The server's error body, when it sent one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::BadRequest(err) | ClientError::NotFound(err) => Some(err),
            _ => None,
        }
    }
}

/// Calls analysis functions over HTTP.
#[derive(Debug, Clone)]
pub struct ElephantClient {
    base_url: String,
    http: Client,
}

impl ElephantClient {
    /// Client for the server at `http://{host}:{port}`.
    pub fn new(host: &str, port: u16) -> Self {
        Self::from_base_url(format!("http://{}:{}", host, port))
    }

    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Use a preconfigured `reqwest` client, e.g. one with a timeout.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `params` (the full request envelope) to `/api/{module}/{name}`.
    pub async fn call(&self, module: &str, name: &str, params: &JsonValue) -> Result<JsonValue, ClientError> {
        let url = format!("{}/api/{}/{}", self.base_url, module, name);
        log::debug!("POST {}", url);
        let response = self.http.post(&url).json(params).send().await?;
        read_json(response).await
    }

    /// Names of the modules the server exposes.
    pub async fn modules(&self) -> Result<Vec<String>, ClientError> {
        self.get(&format!("{}/api", self.base_url)).await
    }

    /// Names of the functions in `module`.
    pub async fn functions(&self, module: &str) -> Result<Vec<String>, ClientError> {
        self.get(&format!("{}/api/{}", self.base_url, module)).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        log::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let api_error = serde_json::from_str::<ApiError>(&body).ok();
    Err(match (status, api_error) {
        (StatusCode::BAD_REQUEST, Some(err)) => ClientError::BadRequest(err),
        (StatusCode::NOT_FOUND, Some(err)) => ClientError::NotFound(err),
        _ => ClientError::Status {
            status: status.as_u16(),
            body,
        },
    })
}
