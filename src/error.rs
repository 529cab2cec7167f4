//! Error types shared by ports, adapters and configuration.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure reported by one of the backend collaborators.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The session has no credentials, or the API rejected them.
    #[error("not authenticated")]
    Unauthorized,

    /// A JSON payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response parsed but did not carry what the caller needs.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Build a status error from a response status and body message.
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        ApiError::Status { status: status.as_u16(), message: message.into() }
    }

    /// Whether repeating the same call could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Failure while reading configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be parsed.
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        /// Environment variable name.
        name: &'static str,
        /// The raw value found.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}
