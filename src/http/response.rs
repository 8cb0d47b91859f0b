//! Rendering dispatch results as HTTP responses.
//!
//! # Design Decisions
//! - Strings render as `text/plain`, `null` as an empty 200, anything else as JSON
//! - Route misses map to 404, rejections to 403, everything else to 500
//! - Internal error details are logged, not sent to the client

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::RouterError;

/// Transforms an action's value before it is rendered.
pub trait PostProcessor: Send + Sync {
    fn process(&self, value: Value) -> Value;
}

impl<F> PostProcessor for F
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn process(&self, value: Value) -> Value {
        self(value)
    }
}

/// Render an action's value.
pub fn render(value: Value) -> Response {
    match value {
        Value::Null => StatusCode::OK.into_response(),
        Value::String(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        other => (StatusCode::OK, Json(other)).into_response(),
    }
}

/// Status code for a final dispatch failure.
pub fn status_for(error: &RouterError) -> StatusCode {
    match error {
        RouterError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        RouterError::AuthorizationRejected { .. } => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a final dispatch failure.
pub fn render_error(error: &RouterError) -> Response {
    let status = status_for(error);
    let message = match status {
        StatusCode::NOT_FOUND => "No matching route found",
        StatusCode::FORBIDDEN => "Access denied",
        _ => "Internal server error",
    };
    (status, message).into_response()
}
