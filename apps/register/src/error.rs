//! # API Error Type
//!
//! Unified error type for register commands and routes.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  POS screen                  Register                                   │
//! │  ──────────                  ────────                                   │
//! │                                                                         │
//! │  POST /checkout/settle                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Core rule broken?  ── CoreError::InsufficientPayment ──┐       │  │
//! │  │  Side store failed? ── DbError::QueryFailed ────────────┤       │  │
//! │  │  Backend failed?    ── RemoteError::Timeout ────────────┴─► ApiError
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 422 { "code": "INSUFFICIENT_PAYMENT", "message": "..." }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tillpoint_core::CoreError;
use tillpoint_db::DbError;
use tillpoint_remote::RemoteError;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Rice: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough stock for the requested quantity (422)
    InsufficientStock,

    /// Received amount below the grand total (422)
    InsufficientPayment,

    /// Cart rule broken (422)
    CartError,

    /// Action not allowed in the current bill state (409)
    SessionError,

    /// Backend rejected or never answered the sale (502)
    CommitFailed,

    /// Backend call failed (502)
    BackendError,

    /// Side store failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock
            | ErrorCode::InsufficientPayment
            | ErrorCode::CartError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::SessionError => StatusCode::CONFLICT,
            ErrorCode::CommitFailed | ErrorCode::BackendError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn session(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::SessionError, message)
    }

    /// A sale commit that did not go through.
    pub fn commit_failed(err: &RemoteError) -> Self {
        ApiError::new(
            ErrorCode::CommitFailed,
            format!("Sale was not saved: {}", err),
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::LineNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            CoreError::InvalidQuantity { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::CartTooLarge { .. }
            | CoreError::NoPendingRemoval
            | CoreError::EmptyCart
            | CoreError::CartNotEmpty
            | CoreError::ZeroQuantityLines => ErrorCode::CartError,
            CoreError::InvalidTransition { .. } | CoreError::CommitInFlight { .. } => {
                ErrorCode::SessionError
            }
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts side-store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Side store operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts backend errors to API errors.
impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Api { status: 404, message } => {
                ApiError::new(ErrorCode::NotFound, message)
            }
            other => ApiError::new(ErrorCode::BackendError, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tillpoint_core::Money;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::InsufficientStock {
            product: "Rice".into(),
            available: Decimal::from(3),
            requested: Decimal::from(5),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::InsufficientPayment {
            received: Money::from_cents(15000),
            due: Money::from_cents(19500),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);

        let err: ApiError = CoreError::CommitInFlight {
            bill_number: "INV-1".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::SessionError);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::not_found("Held sale", "BILL-1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Held sale not found: BILL-1");
    }

    #[test]
    fn test_remote_errors_map_to_backend_error() {
        let err: ApiError = RemoteError::Timeout(10).into();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.code.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::commit_failed(&RemoteError::Timeout(10));
        assert_eq!(err.code, ErrorCode::CommitFailed);
    }
}
