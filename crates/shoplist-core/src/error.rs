//! API error handling
//!
//! Transport failures are reported as a structured [`ApiError`]. The store
//! layer maps them onto one of four [`FailureClass`]es to produce the message
//! shown to the user when a listing cannot be loaded.

use thiserror::Error;

/// Shown when the server cannot be reached at all
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection and try again.";

/// Shown for any 5xx response
pub const SERVER_FAILURE_MESSAGE: &str =
    "The server is currently unavailable. Please try again later.";

/// Fallback when a failure carries no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors returned by a [`Transport`](crate::transport::Transport)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connection refused, DNS failure, connection reset
    #[error("Network error: {0}")]
    Network(String),

    /// The request was aborted before a response arrived (including timeouts)
    #[error("Request aborted: {0}")]
    Aborted(String),

    /// The server answered with a non-success status
    #[error("{}", status_display(*status, message.as_deref()))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be built or its body could not be encoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// User-facing classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Connectivity-level failure
    NetworkFailure,
    /// HTTP 5xx
    ServerFailure,
    /// HTTP 4xx, surfaced verbatim
    ClientFailure,
    /// Anything else
    Unclassified,
}

impl ApiError {
    /// Build a status error
    pub fn status(status: u16, message: impl Into<Option<String>>) -> Self {
        ApiError::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status, if the server answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message carried by the failure, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Network(msg)
            | ApiError::Aborted(msg)
            | ApiError::InvalidResponse(msg)
            | ApiError::InvalidRequest(msg) => Some(msg.as_str()).filter(|m| !m.is_empty()),
            ApiError::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
        }
    }

    /// Classify the failure
    pub fn class(&self) -> FailureClass {
        match self {
            ApiError::Network(_) | ApiError::Aborted(_) => FailureClass::NetworkFailure,
            ApiError::Status { status, .. } if *status >= 500 => FailureClass::ServerFailure,
            ApiError::Status { status, .. } if *status >= 400 => FailureClass::ClientFailure,
            _ => FailureClass::Unclassified,
        }
    }

    /// Message to show the user when a listing fails to load
    pub fn user_message(&self) -> String {
        match self.class() {
            FailureClass::NetworkFailure => NETWORK_FAILURE_MESSAGE.to_string(),
            FailureClass::ServerFailure => SERVER_FAILURE_MESSAGE.to_string(),
            FailureClass::ClientFailure | FailureClass::Unclassified => self
                .message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.class(),
            FailureClass::NetworkFailure | FailureClass::ServerFailure
        )
    }
}

fn status_display(status: u16, message: Option<&str>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => format!("API request failed: {}", status),
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
