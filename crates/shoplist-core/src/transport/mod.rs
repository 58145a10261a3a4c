//! Request/response plumbing
//!
//! Stores talk to the REST API through the [`Transport`] trait so the HTTP
//! client can be swapped out (tests use an in-memory transport).
//!
//! ## Call shape
//!
//! ```text
//! request(path, method, query?, body?) -> JSON | ApiError
//! ```
//!
//! Successful responses without a JSON body come back as `Value::Null`.

mod http;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

pub use http::HttpTransport;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append query parameters
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize and attach a JSON body
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> ApiResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(self.with_body(value))
    }

    /// Look up a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Performs API calls
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the parsed JSON response
    async fn request(&self, request: ApiRequest) -> ApiResult<Value>;

    /// Replace the bearer token sent with later requests (None logs out)
    ///
    /// Transports without authentication ignore it.
    fn set_token(&self, _token: Option<String>) {}
}

/// Flatten a filter struct into query parameters
///
/// `null` and empty-string values are skipped. Nested values are not
/// supported by the API and are rejected.
pub fn query_pairs<F: Serialize + ?Sized>(filter: &F) -> ApiResult<Vec<(String, String)>> {
    let value =
        serde_json::to_value(filter).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::InvalidRequest(format!(
                "query parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) if s.is_empty() => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "unsupported query value for '{}': {}",
                    key, other
                )))
            }
        };
        pairs.push((key, rendered));
    }
    Ok(pairs)
}
