// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{DateTime, Utc};
use idea_journal::config::Config;
use idea_journal::db::FirestoreDb;
use idea_journal::middleware::auth::create_test_token;
use idea_journal::models::User;
use idea_journal::routes::create_router;
use idea_journal::services::{CloudinaryClient, FirebaseAuth};
use idea_journal::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Check if both the Firestore and Auth emulators are available.
#[allow(dead_code)]
pub fn auth_emulator_available() -> bool {
    emulator_available() && std::env::var("FIREBASE_AUTH_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Skip test with message if the Auth emulator is not available.
#[macro_export]
macro_rules! require_auth_emulator {
    () => {
        if !crate::common::auth_emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST or FIREBASE_AUTH_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

#[allow(dead_code)]
fn build_app(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let firebase = FirebaseAuth::new(&config).expect("Failed to build Firebase client");
    let cloudinary =
        CloudinaryClient::new(&config.cloudinary).expect("Failed to build Cloudinary client");

    let state = Arc::new(AppState {
        config,
        db,
        firebase,
        cloudinary,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_app(test_db_offline())
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    build_app(test_db().await)
}

/// Unique suffix for test isolation.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Store a fresh user and return it with a bearer token for it.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState) -> (User, String) {
    let suffix = unique_suffix();
    let user = User::new(
        uuid::Uuid::now_v7().to_string(),
        format!("uid-{suffix}"),
        "Test".to_string(),
        "User".to_string(),
        format!("user-{suffix}@example.com"),
        Utc::now(),
    );
    let user = state.db.insert_user(&user).await.expect("insert user");
    let token = bearer_for(&user.email, &state.config);
    (user, token)
}

/// Test-stage bearer token for `email`.
#[allow(dead_code)]
pub fn bearer_for(email: &str, config: &Config) -> String {
    let secret = config.jwt_secret.as_deref().expect("test config has a secret");
    create_test_token(email, secret).expect("token")
}

/// Build a JSON request, optionally authenticated.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Parse an RFC 3339 timestamp.
#[allow(dead_code)]
pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
