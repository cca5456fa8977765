use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bridge_core::BridgeError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit 4xx errors
// ---------------------------------------------------------------------------

/// Carries a 405 through the `anyhow::Error` chain.
#[derive(Debug, Error)]
#[error("{0}")]
struct MethodNotAllowed(String);

/// Carries a 400 through the `anyhow::Error` chain.
#[derive(Debug, Error)]
#[error("{0}")]
struct BadRequest(String);

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Always renders
/// `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequest(msg.into()).into())
    }

    /// Construct a 405 Method Not Allowed error.
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self(MethodNotAllowed(msg.into()).into())
    }

    pub fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<MethodNotAllowed>().is_some() {
            return StatusCode::METHOD_NOT_ALLOWED;
        }
        if self.0.downcast_ref::<BadRequest>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        match self.0.downcast_ref::<BridgeError>() {
            Some(BridgeError::InvalidActionId(_)) => StatusCode::BAD_REQUEST,
            Some(
                BridgeError::BackendNotSet(_)
                | BridgeError::InvalidMethod(_)
                | BridgeError::InvalidUrl { .. }
                | BridgeError::PolicyConflict(_)
                | BridgeError::Io(_)
                | BridgeError::Yaml(_)
                | BridgeError::Json(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "ok": false, "error": self.0.to_string() });
        if status == StatusCode::METHOD_NOT_ALLOWED {
            return (status, [(header::ALLOW, "POST")], axum::Json(body)).into_response();
        }
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
