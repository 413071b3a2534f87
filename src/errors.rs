use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Which service operation failed, used to prefix transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Index,
    Search,
    Create,
}

impl Operation {
    /// Fixed prefix attached to every transport error of this operation.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Operation::Index | Operation::Search => "Error fetching citizens",
            Operation::Create => "Error creating citizen",
        }
    }
}

/// Errors returned by the citizen service.
///
/// A missing backend configuration is not an error: the service falls back
/// to mock data instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitizenError {
    /// The outbound request failed, returned a non-2xx status, or sent an unreadable body.
    Transport {
        /// Operation that issued the request.
        operation: Operation,
        /// Message of the underlying failure.
        message: String,
    },
    /// Request parameters rejected before any work was done.
    InvalidParams(String),
    /// The HTTP client could not be built.
    Client(String),
}

impl CitizenError {
    /// Wraps an underlying failure message, falling back to `"Unknown error"`
    /// when the failure carried no message at all.
    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };
        CitizenError::Transport { operation, message }
    }
}

impl fmt::Display for CitizenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitizenError::Transport { operation, message } => {
                write!(f, "{}: {}", operation.error_prefix(), message)
            }
            CitizenError::InvalidParams(msg) => write!(f, "Invalid parameters: {}", msg),
            CitizenError::Client(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for CitizenError {}

impl IntoResponse for CitizenError {
    /// Maps each variant to a status code and a `{"error": ...}` body.
    fn into_response(self) -> Response {
        let status = match &self {
            CitizenError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            // Already logged by the service
            CitizenError::Transport { .. } => StatusCode::BAD_GATEWAY,
            CitizenError::Client(_) => {
                tracing::error!("Internal error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
