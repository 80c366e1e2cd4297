// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation on public routes, run against the offline database.
//!
//! Every rejection must be a 400 envelope rather than a plain-text body.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, json_request};

async fn assert_bad_request(response: axum::response::Response) -> serde_json::Value {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    body
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/signup",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "not-an-email",
                "password": "secret123"
            })),
        ))
        .await
        .unwrap();

    let body = assert_bad_request(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Request body is not valid"));
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/signup",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "123"
            })),
        ))
        .await
        .unwrap();

    assert_bad_request(response).await;
}

#[tokio::test]
async fn test_signup_rejects_missing_fields() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/signup",
            None,
            Some(json!({"email": "ada@example.com"})),
        ))
        .await
        .unwrap();

    assert_bad_request(response).await;
}

#[tokio::test]
async fn test_signup_rejects_malformed_json() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_bad_request(response).await;
}

#[tokio::test]
async fn test_signup_rejects_missing_content_type() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .body(Body::from(r#"{"email":"ada@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_bad_request(response).await;
}

#[tokio::test]
async fn test_signup_database_failure_is_wrapped() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/signup",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "secret123"
            })),
        ))
        .await
        .unwrap();

    let body = assert_bad_request(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Error in signing up: "), "{message}");
    assert!(message.contains("offline"), "{message}");
}

#[tokio::test]
async fn test_user_lookup_requires_email() {
    let (app, _) = create_test_app();

    for uri in ["/api/users", "/api/users/", "/api/users?email=", "/api/users?email=%20"] {
        let response = app
            .clone()
            .oneshot(json_request("GET", uri, None, None))
            .await
            .unwrap();
        assert_bad_request(response).await;
    }
}

#[tokio::test]
async fn test_user_lookup_database_failure() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/users?email=ada@example.com",
            None,
            None,
        ))
        .await
        .unwrap();

    let body = assert_bad_request(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Error in getting user by email: "), "{message}");
    assert!(message.contains("offline"), "{message}");
}

#[tokio::test]
async fn test_signup_rejects_blank_names() {
    let (app, _) = create_test_app();

    for (first, last) in [("   ", "Lovelace"), ("Ada", "\t"), ("", "")] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/users/signup",
                None,
                Some(json!({
                    "firstName": first,
                    "lastName": last,
                    "email": "ada@example.com",
                    "password": "secret123"
                })),
            ))
            .await
            .unwrap();

        let body = assert_bad_request(response).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Request body is not valid"));
    }
}

#[tokio::test]
async fn test_error_message_rejects_invalid_body() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/error-message",
            None,
            Some(json!({"msg": 42})),
        ))
        .await
        .unwrap();

    assert_bad_request(response).await;
}
