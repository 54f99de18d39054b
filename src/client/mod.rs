//! Typed client for the dashboard REST API.
//!
//! Used by the scheduler jobs and by anything else that needs to talk to
//! the backend without touching the store. Every request carries the
//! `x-api-key` header; non-2xx responses become [`ClientError::Api`].

mod e2e;
mod notifications;
mod resources;

pub use notifications::MarkReadOutcome;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::API_KEY_HEADER;

/// Connect timeout for API calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Total timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`DashboardClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, TLS.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The body could not be decoded into the expected type.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Handle to the dashboard API. Clones share the connection pool.
#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl DashboardClient {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(API_KEY_HEADER, self.api_key.expose_secret())
    }

    /// Send and decode a JSON body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let resp = check_status(builder.send().await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and discard the body.
    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Render `?k=v&...` from the pairs that have a value.
pub(crate) fn query_string(pairs: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(k, v)| {
            v.as_ref()
                .map(|v| format!("{}={}", k, urlencoding::encode(v)))
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
