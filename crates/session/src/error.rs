//! Visitor identification errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Rejection for requests that cannot be tied to a visitor session
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    MissingVisitor,
    InvalidVisitor,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            SessionError::MissingVisitor => (
                StatusCode::BAD_REQUEST,
                "MISSING_VISITOR",
                "x-visitor-id header required",
            ),
            SessionError::InvalidVisitor => (
                StatusCode::BAD_REQUEST,
                "INVALID_VISITOR",
                "x-visitor-id must be a UUID",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
