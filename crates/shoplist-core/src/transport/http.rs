//! reqwest-backed transport

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiRequest, Method, Transport};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP transport for the REST API
///
/// Joins request paths onto the configured base URL, attaches the bearer
/// token when one is set and applies the configured timeout to every call.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: RwLock::new(None),
        })
    }

    /// Create a transport from application configuration
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let transport = Self::new(config.api_url.clone(), config.timeout())?;
        transport.set_token(config.token.clone());
        Ok(transport)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token (None logs out)
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token.filter(|t| !t.is_empty());
    }

    /// Whether a bearer token is set
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Build the absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(to_reqwest_method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.current_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let body = response.bytes().await;

        if !status.is_success() {
            if let Err(ref e) = body {
                debug!("Failed to read error body from {}: {}", url, e);
            }
            let err = status_error(status.as_u16(), body.as_deref().ok());
            warn!("{} {} failed: {}", request.method, url, err);
            return Err(err);
        }

        let bytes = body.map_err(|e| ApiError::Network(e.to_string()))?;

        if !is_json || bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(ApiError::from)
    }

    fn set_token(&self, token: Option<String>) {
        HttpTransport::set_token(self, token);
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Aborted(err.to_string())
    } else if err.is_builder() {
        ApiError::InvalidRequest(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Error for a non-success status
///
/// The status is kept even when the body could not be read.
fn status_error(status: u16, body: Option<&[u8]>) -> ApiError {
    let message = error_message(status, body.unwrap_or_default());
    ApiError::status(status, Some(message))
}

/// Message for a failed response: the body's `message` or a status line
fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API request failed: {}", status))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
