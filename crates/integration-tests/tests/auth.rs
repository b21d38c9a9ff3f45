//! Registration, login and profile updates over HTTP.

use reqwest::StatusCode;
use serde_json::json;

use ecothread_client::validation::SignupForm;
use ecothread_client::{NETWORK_ERROR, ProfileChanges};
use ecothread_core::UserId;
use ecothread_integration_tests::{TEST_PASSWORD, TestApp};

#[tokio::test]
async fn test_register_creates_level_one_user() {
    let app = TestApp::spawn().await;

    let user = app.register("ada@example.com", "Ada Lovelace").await;

    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["name"], "Ada Lovelace");
    assert_eq!(user["currentLevel"], 1);
    assert_eq!(user["username"], "");
    assert_eq!(user["stylePreferences"], json!([]));
    assert!(user.get("passwordHash").is_none());
    assert_eq!(app.users.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com", "Ada").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            json!({ "email": "ada@example.com", "password": "another1" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists with this email");
    assert_eq!(app.users.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_registrations_create_one_user() {
    let app = TestApp::spawn().await;

    let requests = (0..6).map(|_| {
        app.other_visitor()
            .post(app.url("/api/auth/register"))
            .json(&json!({ "email": "race@example.com", "password": TEST_PASSWORD }))
            .send()
    });
    let responses = spawn_all(requests).await;

    let created = responses
        .iter()
        .filter(|status| **status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert_eq!(app.users.len().await, 1);
}

async fn spawn_all<F>(requests: impl Iterator<Item = F>) -> Vec<StatusCode>
where
    F: std::future::Future<Output = reqwest::Result<reqwest::Response>> + Send + 'static,
{
    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    let mut statuses = Vec::new();
    for handle in handles {
        let response = handle.await.expect("task panicked").expect("request failed");
        statuses.push(response.status());
    }
    statuses
}

#[tokio::test]
async fn test_register_requires_credentials_and_valid_email() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/api/auth/register", json!({ "email": "ada@example.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post("/api/auth/register", json!({ "email": "not-an-email", "password": "secret1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.users.len().await, 0);
}

#[tokio::test]
async fn test_login_logout_and_me() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com", "Ada").await;

    let (status, _) = app.post("/api/auth/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .post("/api/auth/login", json!({ "email": "ada@example.com", "password": "wrong-pass" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = app
        .post("/api/auth/login", json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = app
        .post("/api/auth/login", json!({ "email": "ada@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_profile_update_merges_known_fields() {
    let app = TestApp::spawn().await;
    let user = app.register("ada@example.com", "Ada").await;
    let id = user["id"].as_i64().expect("numeric id");

    let (status, body) = app
        .put(
            &format!("/api/user/profile/{id}"),
            json!({
                "username": "threadqueen",
                "stylePreferences": ["Vintage", "Minimalist"],
                "role": "admin"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "threadqueen");
    assert_eq!(body["user"]["stylePreferences"], json!(["Vintage", "Minimalist"]));
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["user"].get("role").is_none());
}

#[tokio::test]
async fn test_profile_update_unknown_user() {
    let app = TestApp::spawn().await;

    for id in ["999", "not-an-id"] {
        let (status, body) = app
            .put(&format!("/api/user/profile/{id}"), json!({ "name": "Ghost" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }
}

#[tokio::test]
async fn test_typed_client_round_trip() {
    let app = TestApp::spawn().await;
    let client = app.api_client();

    let form = SignupForm {
        full_name: "Grace Brewster Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        ..Default::default()
    };
    form.validate().expect("form is valid");

    let response = client.register(&form.email, &form.password, &form.profile()).await;
    assert!(response.success, "{:?}", response.message);
    let user = response.user.expect("user returned");
    assert_eq!(user.first_name, "Grace");
    assert_eq!(user.last_name, "Brewster Hopper");

    let again = client.register(&form.email, &form.password, &form.profile()).await;
    assert!(!again.success);
    assert_eq!(again.message.as_deref(), Some("User already exists with this email"));

    let login = client.login(&form.email, "wrong-password").await;
    assert_eq!(login.message.as_deref(), Some("Invalid email or password"));

    let changes = ProfileChanges {
        username: Some("amazing_grace".to_string()),
        ..Default::default()
    };
    let updated = client.update_profile(user.id, &changes).await;
    assert_eq!(updated.user.expect("user returned").username, "amazing_grace");

    let missing = client.update_profile(UserId::new(4242), &changes).await;
    assert_eq!(missing.message.as_deref(), Some("User not found"));
}

#[tokio::test]
async fn test_typed_client_reports_network_errors() {
    let client = ecothread_client::ApiClient::new("http://127.0.0.1:9/api");
    let response = client.login("ada@example.com", TEST_PASSWORD).await;
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some(NETWORK_ERROR));
}
