//! Error types and HTTP error response handling.
//!
//! The service exposes a small closed set of error kinds. Each kind carries
//! a stable numeric code so that clients can classify failures without
//! parsing messages, and each maps to a fixed HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Business-rule violations (`NotFound`, `Conflict`, `InvalidState`,
/// `InsufficientFunds`, `InvalidRequest`) are raised at the point of
/// violation and reported as client errors. Storage and unexpected failures
/// are reported as server errors with the cause logged but never exposed.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Referenced account, transaction or customer does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated at creation time
    /// (account number or customer identification already in use).
    #[error("{0}")]
    Conflict(String),

    /// Attempted mutation of an immutable field, or update/delete of a
    /// transaction that is not the most recent one for its account.
    #[error("{0}")]
    InvalidState(String),

    /// The resulting balance would be negative.
    #[error("Insufficient funds for this transaction")]
    InsufficientFunds,

    /// Request body or parameters are invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// The underlying store raised an error. Wrapped here with the original
    /// cause preserved, never silently swallowed.
    #[error("Storage error")]
    Storage(#[source] anyhow::Error),

    /// Anything not classified above, with the cause kept for diagnostics.
    #[error("Unexpected error")]
    Unexpected(#[source] anyhow::Error),
}

impl AppError {
    /// Stable numeric code reported to clients alongside the message.
    pub fn error_code(&self) -> u16 {
        match self {
            AppError::Unexpected(_) => 1000,
            AppError::Storage(_) => 1002,
            AppError::InvalidRequest(_) => 1004,
            AppError::Conflict(_) => 1006,
            AppError::NotFound(_) => 1007,
            AppError::InvalidState(_) => 1015,
            AppError::InsufficientFunds => 1016,
        }
    }
}

/// sqlx errors surface at the Postgres adapter boundary and are
/// reclassified as storage failures.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.into())
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": 1016,
///     "message": "Insufficient funds for this transaction"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `NotFound` → 404
/// - `Conflict` → 409
/// - `InvalidState`, `InvalidRequest` → 400
/// - `InsufficientFunds` → 422
/// - `Storage`, `Unexpected` → 500 (details hidden from the client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InsufficientFunds => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Storage(cause) => {
                tracing::error!("storage failure: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Unexpected(cause) => {
                tracing::error!("unexpected failure: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::Unexpected(anyhow::anyhow!("x")).error_code(), 1000);
        assert_eq!(AppError::Storage(anyhow::anyhow!("x")).error_code(), 1002);
        assert_eq!(AppError::InvalidRequest("x".into()).error_code(), 1004);
        assert_eq!(AppError::Conflict("x".into()).error_code(), 1006);
        assert_eq!(AppError::NotFound("x".into()).error_code(), 1007);
        assert_eq!(AppError::InvalidState("x".into()).error_code(), 1015);
        assert_eq!(AppError::InsufficientFunds.error_code(), 1016);
    }
}
