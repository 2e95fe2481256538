//! Error types for the lookup proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Lookup Error Enum ==
/// Unified error type for the vehicle lookup proxy.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Registration failed the permissive shape check
    #[error("Invalid registration: {0}")]
    InvalidInput(String),

    /// Token endpoint rejected the client-credentials exchange
    #[error("Token exchange rejected with status {status}: {body}")]
    UpstreamAuth { status: u16, body: String },

    /// Token endpoint returned success but the payload was unusable
    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(String),

    /// Vehicle API rejected the lookup
    #[error("Upstream request failed with status {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    /// A required upstream field was missing or not a string
    #[error("Malformed upstream response: field '{field}'")]
    MalformedResponse { field: &'static str },

    /// MOT expiry date could not be parsed
    #[error("Malformed MOT expiry date: {0}")]
    MalformedDate(String),

    /// Odometer value could not be parsed
    #[error("Malformed mileage value: {0}")]
    MalformedMileage(String),

    /// The token or vehicle endpoint did not answer in time
    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    /// Transport-level failure reaching an upstream endpoint
    #[error("Upstream transport error: {0}")]
    Transport(String),
}

impl LookupError {
    /// Classifies a reqwest failure: timeouts get their own kind so the
    /// boundary can answer 504, everything else (connect, decode) is a
    /// transport fault.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::UpstreamTimeout(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match &self {
            LookupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // Upstream 404 means the registration is unknown, not that the
            // gateway is broken.
            LookupError::UpstreamHttp { status: 404, .. } => StatusCode::NOT_FOUND,
            LookupError::UpstreamAuth { .. }
            | LookupError::MalformedTokenResponse(_)
            | LookupError::UpstreamHttp { .. }
            | LookupError::Transport(_) => StatusCode::BAD_GATEWAY,
            LookupError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            LookupError::MalformedResponse { .. }
            | LookupError::MalformedDate(_)
            | LookupError::MalformedMileage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the lookup proxy.
pub type Result<T> = std::result::Result<T, LookupError>;
