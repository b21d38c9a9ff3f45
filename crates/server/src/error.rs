//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"success": false, "message": "..."}`; server-side failures are captured
//! to Sentry before responding and never leak their details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use ecothread_core::checkout::CheckoutError;
use ecothread_core::listings::ListingError;
use ecothread_core::orders::OrderError;

use crate::db::RepositoryError;
use crate::gemini::GeminiError;
use crate::services::auth::AuthError;

/// Which auth endpoint failed; picks the fallback message for unexpected
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Register,
    Login,
    Profile,
    Session,
}

impl AuthOperation {
    const fn fallback(self) -> (StatusCode, &'static str) {
        match self {
            Self::Register => (StatusCode::BAD_REQUEST, "Registration failed"),
            Self::Login => (StatusCode::INTERNAL_SERVER_ERROR, "Login failed"),
            Self::Profile => (StatusCode::INTERNAL_SERVER_ERROR, "Profile update failed"),
            Self::Session => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error ({operation:?}): {source}")]
    Auth {
        operation: AuthOperation,
        #[source]
        source: AuthError,
    },

    /// Checkout transition rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Listing draft failed validation.
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Order update rejected.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Gemini call failed.
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The assistant produced no usable answer.
    #[error("Assistant failed: {0}")]
    AssistantFailed(&'static str),

    /// No Gemini API key configured.
    #[error("AI assistant is not configured")]
    AssistantUnavailable,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap an `AuthError` raised while handling `operation`.
    pub fn auth(operation: AuthOperation) -> impl FnOnce(AuthError) -> Self {
        move |source| Self::Auth { operation, source }
    }

    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_)
            | Self::Gemini(_)
            | Self::Session(_)
            | Self::Internal(_) => true,
            Self::Auth { source, .. } => {
                matches!(source, AuthError::Repository(_) | AuthError::PasswordHash)
            }
            _ => false,
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::Auth { operation, source } => match source {
                AuthError::MissingCredentials => {
                    (StatusCode::BAD_REQUEST, "Email and password are required".to_string())
                }
                AuthError::InvalidEmail(_) => (
                    StatusCode::BAD_REQUEST,
                    "Please enter a valid email address".to_string(),
                ),
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, source.to_string())
                }
                AuthError::UserNotFound => (StatusCode::NOT_FOUND, source.to_string()),
                AuthError::UserAlreadyExists => (StatusCode::BAD_REQUEST, source.to_string()),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    let (status, message) = operation.fallback();
                    (status, message.to_string())
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::LoginRequired => (
                    StatusCode::UNAUTHORIZED,
                    "Please log in to check out".to_string(),
                ),
                CheckoutError::EmptyCart => {
                    (StatusCode::BAD_REQUEST, "Your cart is empty".to_string())
                }
                CheckoutError::MissingCardNumber => {
                    (StatusCode::BAD_REQUEST, "Card number is required".to_string())
                }
                CheckoutError::InvalidPhase { .. } => (StatusCode::CONFLICT, capitalize(&err.to_string())),
            },
            Self::Listing(_) => (
                StatusCode::BAD_REQUEST,
                "Please fix the listing details".to_string(),
            ),
            Self::Order(err) => match err {
                OrderError::NotFound(_) => (StatusCode::NOT_FOUND, "Order not found".to_string()),
                OrderError::NotPendingSale(_) => (
                    StatusCode::CONFLICT,
                    "Only pending sales can be shipped".to_string(),
                ),
            },
            Self::Gemini(_) => (
                StatusCode::BAD_GATEWAY,
                "The assistant could not answer right now".to_string(),
            ),
            Self::AssistantFailed(message) => (StatusCode::BAD_GATEWAY, (*message).to_string()),
            Self::AssistantUnavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what.clone()),
            Self::Unauthorized(what) => (StatusCode::UNAUTHORIZED, what.clone()),
            Self::BadRequest(what) => (StatusCode::BAD_REQUEST, what.clone()),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let (status, message) = self.status_and_message();

        let body = match &self {
            Self::Listing(err) => json!({
                "success": false,
                "message": message,
                "errors": err.messages(),
            }),
            _ => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Payment completed", Some(&[("orders", "2")]));
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
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use ecothread_core::listings::ListingRule;
    use ecothread_core::{OrderId, checkout::CheckoutPhase};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("listing m99".to_string());
        assert_eq!(err.to_string(), "Not found: listing m99");
    }

    #[tokio::test]
    async fn test_auth_messages() {
        let (status, body) =
            render(AppError::auth(AuthOperation::Register)(AuthError::UserAlreadyExists)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User already exists with this email");

        let (status, body) =
            render(AppError::auth(AuthOperation::Login)(AuthError::InvalidCredentials)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");

        let (status, body) =
            render(AppError::auth(AuthOperation::Profile)(AuthError::UserNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_auth_fallbacks_hide_details() {
        let db = || AuthError::Repository(RepositoryError::Database(sqlx::Error::PoolTimedOut));

        let (status, body) = render(AppError::auth(AuthOperation::Login)(db())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Login failed");

        let (status, body) = render(AppError::auth(AuthOperation::Profile)(db())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Profile update failed");

        let (status, body) = render(AppError::auth(AuthOperation::Register)(db())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Registration failed");
    }

    #[tokio::test]
    async fn test_listing_errors_are_listed() {
        let err = ListingError::Invalid(vec![ListingRule::NameRequired, ListingRule::PhotoRequired]);
        let (status, body) = render(AppError::Listing(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_domain_status_codes() {
        assert_eq!(
            render(CheckoutError::LoginRequired.into()).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            render(CheckoutError::EmptyCart.into()).await.0,
            StatusCode::BAD_REQUEST
        );
        let (status, body) = render(
            CheckoutError::InvalidPhase {
                action: "pay",
                phase: CheckoutPhase::Browsing,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().starts_with("Cannot pay"));

        assert_eq!(
            render(OrderError::NotFound(OrderId::from("ORD-1")).into()).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            render(OrderError::NotPendingSale(OrderId::from("ORD-1")).into()).await.0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            render(AppError::AssistantUnavailable).await.0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            render(GeminiError::EmptyResponse.into()).await.0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_internal_details_not_leaked() {
        let (status, body) = render(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
