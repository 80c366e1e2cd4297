// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token authentication middleware.
//!
//! In the test stage tokens are HS256 JWTs signed with `JWT_SECRET`; in every
//! other stage they are Firebase ID tokens. Test-stage tokens are resolved to
//! a stored user by their `email` claim, Firebase tokens by their UID.

use crate::config::Stage;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Test-stage JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Middleware that requires a valid bearer token belonging to a known user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers().get(header::AUTHORIZATION))?;

    // Firebase tokens resolve by account UID; test-stage tokens only carry an email.
    let user = match state.config.stage {
        Stage::Test => {
            let secret = state
                .config
                .jwt_secret
                .as_deref()
                .ok_or_else(|| AppError::Unauthorized("Token verification unavailable".into()))?;
            let email = verify_local_token(token, secret)?.email;
            resolve_user(state.db.get_user_by_email(&email).await, &email)?
        }
        Stage::Development | Stage::Production => {
            let identity = state.firebase.verify_id_token(token).await.map_err(|e| {
                tracing::warn!(error = %e, "ID token rejected");
                AppError::Unauthorized("Invalid token".to_string())
            })?;
            resolve_user(
                state.db.get_user_by_firebase_uid(&identity.uid).await,
                &identity.uid,
            )?
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// Map a user lookup to the authenticated user, or 401.
fn resolve_user(lookup: Result<Option<User>, AppError>, subject: &str) -> Result<User, AppError> {
    lookup
        .map_err(|e| {
            tracing::error!(error = %e, subject, "User lookup failed during auth");
            AppError::Unauthorized("Unable to resolve user".to_string())
        })?
        .ok_or_else(|| {
            tracing::debug!(subject, "Token for unknown user");
            AppError::Unauthorized("Unknown user".to_string())
        })
}

fn extract_bearer_token(auth_header: Option<&HeaderValue>) -> Result<&str, AppError> {
    let value = auth_header
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must be Bearer token".to_string())
    })?;

    if token.trim().is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token.trim())
}

/// Verify a test-stage HS256 token.
pub fn verify_local_token(token: &str, secret: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;

    if token_data.claims.email.is_empty() {
        return Err(AppError::Unauthorized("Missing email claim".to_string()));
    }

    Ok(token_data.claims)
}

/// Create a test-stage token for `email`, valid for one day.
pub fn create_test_token(email: &str, secret: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        email: email.to_string(),
        iat: now,
        exp: now + 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}
