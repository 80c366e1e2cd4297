// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens, using the envelope
//! 2. A valid token whose user cannot be resolved is still rejected
//! 3. Public utility routes need no token
//! 4. CORS preflight requests return correct headers

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, json_request};

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

async fn assert_unauthorized(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["status_code"], 401);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request("GET", "/api/ideas", None, None))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_every_protected_route_requires_token() {
    let id = "0190a5b2-0000-7000-8000-000000000000";
    let routes = [
        ("GET", "/api/ideas".to_string()),
        ("POST", "/api/ideas/".to_string()),
        ("GET", format!("/api/ideas/{id}")),
        ("PUT", format!("/api/ideas/{id}")),
        ("DELETE", format!("/api/ideas/{id}")),
        ("GET", "/api/ideas/total/today".to_string()),
        ("GET", "/api/ideas/total/all".to_string()),
        ("GET", "/api/ideas/total/consecutive".to_string()),
        ("GET", "/api/ideas/recent".to_string()),
        ("GET", "/api/ideas/weekly".to_string()),
        ("POST", "/api/ideas/search".to_string()),
        ("PUT", format!("/api/users/{id}")),
        ("POST", "/api/users/images".to_string()),
        ("DELETE", "/api/users/images".to_string()),
    ];

    let (app, _) = create_test_app();
    for (method, uri) in routes {
        let response = app
            .clone()
            .oneshot(json_request(method, &uri, None, None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require auth"
        );
    }
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request("GET", "/api/ideas", Some("invalid.token.here"), None))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_protected_route_with_non_bearer_scheme() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ideas")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret() {
    #[derive(Serialize)]
    struct Claims {
        email: String,
        exp: usize,
        iat: usize,
    }

    let now = now_secs();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            email: "ada@example.com".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(b"some_other_secret_32_bytes_long!"),
    )
    .unwrap();

    let (app, _) = create_test_app();
    let response = app
        .oneshot(json_request("GET", "/api/ideas", Some(&token), None))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_expired_token() {
    #[derive(Serialize)]
    struct Claims {
        email: String,
        exp: usize,
        iat: usize,
    }

    let (app, state) = create_test_app();
    let now = now_secs();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            email: "ada@example.com".to_string(),
            exp: now - 7200,
            iat: now - 10000,
        },
        &EncodingKey::from_secret(state.config.jwt_secret.as_deref().unwrap()),
    )
    .unwrap();

    let response = app
        .oneshot(json_request("GET", "/api/ideas", Some(&token), None))
        .await
        .unwrap();

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_valid_token_with_unreachable_database_is_unauthorized() {
    let (app, state) = create_test_app();
    let token = common::bearer_for("ada@example.com", &state.config);

    let response = app
        .oneshot(json_request("GET", "/api/ideas/recent", Some(&token), None))
        .await
        .unwrap();

    // The user cannot be resolved, so the handler never runs.
    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_healthcheck_is_public() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(json_request("GET", "/api/healthcheck", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["message"], "");
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["buildId"].is_string());
}

#[tokio::test]
async fn test_error_message_is_public() {
    let (app, _) = create_test_app();

    for uri in ["/api/error-message", "/api/error-message/"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                uri,
                None,
                Some(serde_json::json!({"message": "TypeError: x is undefined"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());
    }
}

#[tokio::test]
async fn test_cors_preflight_for_frontend() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/ideas")
                .header(header::ORIGIN, state.config.frontend_url.as_str())
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(
                    header::ACCESS_CONTROL_REQUEST_HEADERS,
                    "authorization,content-type",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        state.config.frontend_url.as_str()
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/ideas")
                .header(header::ORIGIN, "https://evil.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
