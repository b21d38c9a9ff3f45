//! ECOthread Client - typed access to the auth and profile API.
//!
//! Every call performs exactly one HTTP request and always yields an
//! [`ApiResponse`]; failures become a message suitable for the sign-in form.
//! Forms are checked with [`validation`] before anything is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use ecothread_client::{ApiClient, validation::LoginForm};
//!
//! let form = LoginForm { email: "ada@example.com".into(), password: "secret1".into() };
//! form.validate()?;
//!
//! let client = ApiClient::default();
//! let response = client.login(&form.email, &form.password).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod types;
pub mod validation;

pub use types::{ApiResponse, ProfileChanges, SignupProfile, User};

use std::sync::Arc;

use ecothread_core::UserId;
use serde::Serialize;

use crate::types::{ErrorBody, LoginBody, RegisterBody, UserBody};

/// Where the API lives when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Message for transport and decoding failures.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

const REGISTRATION_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";

/// Client for the ECOthread auth API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:5000/api`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Create an account.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: &SignupProfile,
    ) -> ApiResponse {
        let body = RegisterBody {
            email,
            password,
            profile,
        };
        let request = self.inner.client.post(self.url("/auth/register")).json(&body);
        self.send(request, REGISTRATION_FAILED).await
    }

    /// Sign in.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        let request = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password });
        self.send(request, LOGIN_FAILED).await
    }

    /// Change profile fields of a user.
    pub async fn update_profile(&self, user_id: UserId, changes: &ProfileChanges) -> ApiResponse {
        self.put_json(&format!("/user/profile/{user_id}"), changes, PROFILE_UPDATE_FAILED)
            .await
    }

    async fn put_json<T: Serialize + Sync>(&self, path: &str, body: &T, fallback: &str) -> ApiResponse {
        let request = self.inner.client.put(self.url(path)).json(body);
        self.send(request, fallback).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, fallback: &str) -> ApiResponse {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "API request failed");
                return ApiResponse::failure(NETWORK_ERROR);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, %status, "Failed to read API response");
                return ApiResponse::failure(NETWORK_ERROR);
            }
        };

        if status.is_success() {
            return match serde_json::from_slice::<UserBody>(&bytes) {
                Ok(body) => ApiResponse::ok(body.user),
                Err(e) => {
                    tracing::error!(error = %e, %status, "Failed to decode API response");
                    ApiResponse::failure(NETWORK_ERROR)
                }
            };
        }

        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => {
                let message = body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                tracing::debug!(%status, %message, "API request rejected");
                ApiResponse::failure(message)
            }
            Err(e) => {
                tracing::error!(error = %e, %status, "Failed to decode API error");
                ApiResponse::failure(NETWORK_ERROR)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        http::StatusCode,
        routing::{post, put},
    };
    use serde_json::{Value, json};

    use super::*;

    fn user_json(id: i32, email: &str) -> Value {
        json!({
            "id": id,
            "email": email,
            "name": "Ada",
            "firstName": "Ada",
            "lastName": "",
            "username": "",
            "phone": "",
            "dob": "",
            "stylePreferences": [],
            "avatar": "",
            "currentLevel": 1,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        })
    }

    async fn spawn(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ApiClient::new(format!("http://{addr}/api/"))
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(ApiClient::default().base_url(), DEFAULT_API_BASE);
    }

    #[tokio::test]
    async fn test_register_sends_flattened_profile() {
        let router = Router::new().route(
            "/api/auth/register",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], "ada@example.com");
                assert_eq!(body["firstName"], "Ada");
                assert!(body.get("phone").is_none());
                (StatusCode::CREATED, Json(json!({"success": true, "user": user_json(7, "ada@example.com")})))
            }),
        );
        let client = spawn(router).await;

        let profile = SignupProfile {
            name: "Ada".to_string(),
            first_name: "Ada".to_string(),
            ..Default::default()
        };
        let response = client.register("ada@example.com", "secret1", &profile).await;

        assert!(response.success);
        assert_eq!(response.user.unwrap().id, UserId::new(7));
    }

    #[tokio::test]
    async fn test_server_message_is_passed_through() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Invalid email or password"})),
                )
            }),
        );
        let client = spawn(router).await;

        let response = client.login("ada@example.com", "wrong-password").await;
        assert_eq!(
            response,
            ApiResponse::failure("Invalid email or password")
        );
    }

    #[tokio::test]
    async fn test_missing_message_falls_back() {
        let router = Router::new().route(
            "/api/user/profile/{id}",
            put(|Path(id): Path<i32>| async move {
                assert_eq!(id, 3);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"success": false})))
            }),
        );
        let client = spawn(router).await;

        let response = client
            .update_profile(UserId::new(3), &ProfileChanges::default())
            .await;
        assert_eq!(response.message.as_deref(), Some("Profile update failed"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}/api"));
        let response = client.login("ada@example.com", "secret1").await;
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_network_error() {
        let router = Router::new().route("/api/auth/login", post(|| async { "not json" }));
        let client = spawn(router).await;

        let response = client.login("ada@example.com", "secret1").await;
        assert_eq!(response.message.as_deref(), Some(NETWORK_ERROR));
    }
}
