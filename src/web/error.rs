//! API error handling.
//!
//! Errors render as the same envelope as successes, with the HTTP status as
//! the numeric code: `{"code": 401, "message": "...", "details": {...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

use crate::admin::AdminError;
use crate::auth::{SessionError, TokenError};

/// Generic message for infrastructure failures.
pub const SYSTEM_ERROR_MESSAGE: &str = "system error, try again";

/// Generic message for every token problem.
pub const NOT_LOGGED_IN_MESSAGE: &str = "not logged in or session expired";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Validation error (422), field-level details attached.
    ValidationError,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// The single message used for every missing or unusable token.
    pub fn not_logged_in() -> Self {
        Self::unauthorized(NOT_LOGGED_IN_MESSAGE)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        // Lead with the first field message so clients showing only `message` stay useful.
        let mut fields: Vec<_> = details.keys().cloned().collect();
        fields.sort();
        let message = fields
            .first()
            .and_then(|f| details.get(f))
            .and_then(|m| m.first())
            .cloned()
            .unwrap_or_else(|| "validation failed".to_string());

        Self {
            code: ErrorCode::ValidationError,
            message,
            details: Some(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            code: status.as_u16(),
            message: self.message,
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        ApiError::not_logged_in()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::InvalidCredentials
            | SessionError::NotLoggedIn
            | SessionError::TwoFactorRequired
            | SessionError::TwoFactorInvalid => ApiError::unauthorized(message),
            SessionError::AccountDisabled => ApiError::forbidden(message),
            SessionError::OldPasswordIncorrect | SessionError::Validation(_) => {
                ApiError::bad_request(message)
            }
            SessionError::Internal(detail) => {
                error!("Internal error: {}", detail);
                ApiError::internal(SYSTEM_ERROR_MESSAGE)
            }
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        let message = err.to_string();
        match err {
            AdminError::Session(inner) => inner.into(),
            AdminError::Validation(_) | AdminError::CannotDeleteSelf => ApiError::bad_request(message),
            AdminError::UsernameTaken => ApiError::conflict(message),
            AdminError::NotFound(_) => ApiError::not_found(message),
            AdminError::Internal(detail) => {
                error!("Internal error: {}", detail);
                ApiError::internal(SYSTEM_ERROR_MESSAGE)
            }
        }
    }
}
