use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pushwave_core::error::CoreError;
use pushwave_db::StoreError;
use pushwave_events::DispatchError;
use serde_json::json;

/// Message returned for a rejected subscription payload.
pub const INVALID_SUBSCRIPTION_MESSAGE: &str = "Invalid subscription payload";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for registry
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent `{ "error", "code" }` JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pushwave_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A subscription registry error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Core(e) => AppError::Core(e),
            DispatchError::Store(e) => AppError::Store(e),
            DispatchError::Payload(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::InvalidSubscription(detail) => {
            tracing::debug!(detail = %detail, "Rejected subscription");
            (
                StatusCode::BAD_REQUEST,
                "INVALID_SUBSCRIPTION",
                INVALID_SUBSCRIPTION_MESSAGE.to_string(),
            )
        }
        CoreError::NoSubscribers => (
            StatusCode::BAD_REQUEST,
            "NO_SUBSCRIBERS",
            err.to_string(),
        ),
    }
}

/// Rejections pass through as client errors; I/O and corruption are 500s
/// with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Core(core) => classify_core_error(core),
        other => {
            tracing::error!(error = %other, "Subscription store error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
