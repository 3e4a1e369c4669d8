//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::orders::OrderError;
use crate::services::reviews::ReviewBookError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog source failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Review submission failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewBookError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateIdentity => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_)
                | AuthError::InvalidName
                | AuthError::WeakPassword(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AuthError::Store(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity
                | CartError::OutOfStock { .. }
                | CartError::ExceedsStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CartError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                OrderError::InvalidAddress(_) | OrderError::EmptyCart => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                OrderError::CorruptHistory(_) | OrderError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Review(err) => match err {
                ReviewBookError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ReviewBookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    // Don't expose internal error details to clients
    fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "Internal server error".to_string(),
            Self::Catalog(_) => "Catalog service unavailable".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::DuplicateIdentity => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidName => "Name is required".to_string(),
                AuthError::Store(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::Cart(CartError::Store(_))
            | Self::Order(OrderError::Store(_) | OrderError::CorruptHistory(_))
            | Self::Review(ReviewBookError::Store(_)) => "Internal server error".to_string(),
            Self::Order(OrderError::NotAuthenticated) => "Please log in to checkout".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Review(err) => err.to_string(),
            Self::NotFound(_) | Self::Validation(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the signed-in email.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use shopfront_core::{AddressError, AddressField};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Validation("rating".to_string());
        assert_eq!(err.to_string(), "Invalid input: rating");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::Status { status: 503 })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_domain_error_status_codes() {
        assert_eq!(
            get_status(AuthError::DuplicateIdentity.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::WeakPassword("short".to_string()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(OrderError::NotAuthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(
                OrderError::InvalidAddress(AddressError::MissingFields(vec![AddressField::City]))
                    .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(OrderError::EmptyCart.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(
                CartError::ExceedsStock {
                    name: "Phone".to_string(),
                    available: 2,
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(
                CartError::OutOfStock {
                    name: "Phone".to_string(),
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
