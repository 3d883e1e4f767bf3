//! # Server Error Types
//!
//! Two families: [`ServerError`] stops the process during startup, and
//! [`ContactError`] is turned into a JSON response for a single request.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Shown to the caller for every internal failure.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Startup and configuration failures.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse server configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Result type for server startup.
pub type ServerResult<T> = Result<T, ServerError>;

/// A delivery target refused a submission.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Why a contact request did not succeed.
#[derive(Error, Debug)]
pub enum ContactError {
    /// One or more fields failed validation. Every failure is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// The body is not a JSON object of strings.
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The accepted submission could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(#[from] SinkError),
}

impl ContactError {
    /// HTTP status for this failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_) | Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed contact response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// Messages for the caller, in rule order.
    pub errors: Vec<String>,
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = match self {
            Self::Invalid(errors) => errors,
            other => {
                tracing::error!(error = %other, "contact form error");
                vec![UNEXPECTED_ERROR.to_owned()]
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ContactError::Invalid(vec!["x".into()]).status(),
            StatusCode::BAD_REQUEST
        );
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ContactError::from(malformed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ContactError::from(SinkError("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_joins_validation_messages() {
        let err = ContactError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation failed: a; b");
    }
}
