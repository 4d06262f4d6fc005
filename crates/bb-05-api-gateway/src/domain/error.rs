//! API Gateway error types.
//!
//! Every failure leaves the gateway as
//! `{"error": {"code": "<kind>", "message": "...", "fields": {...}}}`,
//! with `fields` present only for validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared_types::FieldErrors;
use std::fmt;

/// Machine-readable error kinds
pub mod codes {
    pub const VALIDATION: &str = "validation";
    pub const NOT_FOUND: &str = "not_found";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const CONFLICT: &str = "conflict";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    pub const TIMEOUT: &str = "timeout";
    pub const INTERNAL: &str = "internal";
}

/// An error as returned to an API caller
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Error kind, one of [`codes`]
    pub code: &'static str,
    /// Human readable message
    pub message: String,
    /// Field-level detail for validation failures
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// 400 carrying every failing field
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: codes::VALIDATION,
            message: "request validation failed".to_string(),
            fields: Some(fields),
        }
    }

    /// 400 for a single failing field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation(FieldErrors::single(field, message))
    }

    /// 400 for a body or query that could not be decoded at all
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::VALIDATION, details)
    }

    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("{} not found", resource),
        )
    }

    /// Missing or invalid credentials
    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, details)
    }

    /// Authenticated, but the role lacks `permission`
    pub fn forbidden(permission: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            codes::FORBIDDEN,
            format!("missing permission '{}'", permission),
        )
    }

    pub fn conflict(details: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, details)
    }

    pub fn payload_too_large(details: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, codes::PAYLOAD_TOO_LARGE, details)
    }

    pub fn timeout(details: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, codes::TIMEOUT, details)
    }

    /// 500 with a generic message. The cause is logged, never returned.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "internal server error",
        )
    }

    /// JSON body for this error
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": ErrorBody::from(self) })
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl<'a> From<&'a ApiError> for ErrorBody<'a> {
    fn from(error: &'a ApiError) -> Self {
        Self {
            code: error.code,
            message: &error.message,
            fields: error.fields.as_ref(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, not per request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O failure
    #[error("server error: {0}")]
    Serve(String),

    /// Seeding the bootstrap administrator failed
    #[error("user directory error: {0}")]
    Users(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ApiError::not_found("blood unit U-1");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, codes::NOT_FOUND);
        assert!(err.message.contains("U-1"));
    }

    #[test]
    fn test_validation_body_has_fields() {
        let mut fields = FieldErrors::new();
        fields.add("status", "unknown status");
        fields.add("notes", "too long");
        let body = ApiError::validation(fields).body();
        assert_eq!(body["error"]["code"], "validation");
        assert_eq!(body["error"]["fields"]["status"], "unknown status");
        assert_eq!(body["error"]["fields"]["notes"], "too long");
    }

    #[test]
    fn test_fields_omitted_when_absent() {
        let body = ApiError::conflict("donor not eligible").body();
        assert!(body["error"].get("fields").is_none());
        assert_eq!(body["error"]["message"], "donor not eligible");
    }

    #[test]
    fn test_internal_is_generic() {
        let err = ApiError::internal();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal server error");
    }
}
