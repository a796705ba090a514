//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bloom_core::{CartError, FieldError};
use serde_json::json;
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::services::{CartUpdateError, CheckoutError, FavoriteError, LookupError, Rejection};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout was refused; carries every field error.
    #[error("{0}")]
    Rejected(Rejection),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(rejection) => Self::Rejected(rejection),
            CheckoutError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => Self::NotFound(format!("order {id}")),
            LookupError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::UnknownItem(id) => Self::NotFound(format!("item {id}")),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<CartUpdateError> for AppError {
    fn from(err: CartUpdateError) -> Self {
        match err {
            CartUpdateError::Cart(e) => e.into(),
            CartUpdateError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<FavoriteError> for AppError {
    fn from(err: FavoriteError) -> Self {
        match err {
            FavoriteError::UnknownItem(id) => Self::NotFound(format!("item {id}")),
            FavoriteError::Storage(e) => Self::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Rejected(rejection) => {
                let body = json!({
                    "errors": rejection.fields.iter().map(field_json).collect::<Vec<_>>(),
                    "empty_cart": rejection.empty_cart,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::Storage(_) | Self::Internal(_) => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                // Don't expose internal error details to clients
                "Internal server error",
            ),
            Self::NotFound(_) => error_body(StatusCode::NOT_FOUND, &self.to_string()),
            Self::BadRequest(_) => error_body(StatusCode::BAD_REQUEST, &self.to_string()),
        }
    }
}

fn field_json(err: &FieldError) -> serde_json::Value {
    json!({ "field": err.field, "message": err.message })
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
