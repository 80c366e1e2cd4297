// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes: sign-up, lookup, profile update and profile images.

use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extractors::{IdPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::models::{Image, Role, User, UserPatch};
use crate::services::{DestroyResult, UploadedImage};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post, put},
    Extension, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// User routes that do not require authentication.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(get_user_by_email))
        .route("/api/users/", get(get_user_by_email))
        .route("/api/users/signup", post(sign_up))
}

/// User routes that require authentication.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/images", post(upload_image).delete(remove_image))
        .route("/api/users/{id}", put(update_user))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub first_name: String,
    #[validate(length(max = 100), custom(function = "non_blank"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadImageRequest {
    /// Data URI or remote URL of the image
    #[validate(length(min = 1))]
    pub image: String,
    #[validate(length(max = 200))]
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RemoveImageRequest {
    #[serde(alias = "publicId")]
    #[validate(length(min = 1, max = 300))]
    pub public_id: String,
}

/// User as returned by the API.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub images: Vec<Image>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            images: user.images,
            created_at: format_utc_rfc3339(user.created_at),
            updated_at: format_utc_rfc3339(user.updated_at),
        }
    }
}

fn non_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("non_blank"))
    } else {
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ─── Handlers ────────────────────────────────────────────────

async fn sign_up(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> Result<Envelope<UserResponse>> {
    let email = normalize_email(&req.email);

    if state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(|e| e.wrap("Error in signing up"))?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "Error in signing up: email {email} is already registered"
        )));
    }

    let user = register_user(&state, &req, uuid::Uuid::now_v7().to_string()).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User signed up");

    Ok(Envelope::ok(user.into()))
}

/// Register an account with the identity provider, then store the profile
/// under `user_id`.
///
/// When the profile cannot be stored the identity account is deleted again.
pub async fn register_user(
    state: &AppState,
    req: &SignUpRequest,
    user_id: String,
) -> Result<User> {
    let email = normalize_email(&req.email);
    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();

    let display_name = format!("{first_name} {last_name}");
    let account = state
        .firebase
        .create_user(&email, &req.password, &display_name)
        .await
        .map_err(|e| e.wrap("Error in creating identity account"))?;

    let user = User::new(
        user_id,
        account.uid.clone(),
        first_name,
        last_name,
        email,
        Utc::now(),
    );

    match state.db.insert_user(&user).await {
        Ok(user) => Ok(user),
        Err(e) => {
            tracing::warn!(
                error = %e,
                uid = %account.uid,
                "Storing new user failed; removing identity account"
            );
            if let Err(cleanup) = state.firebase.delete_user(&account.id_token).await {
                tracing::error!(
                    error = %cleanup,
                    uid = %account.uid,
                    "Failed to remove identity account after sign-up failure"
                );
            }
            Err(e.wrap("Error in creating user"))
        }
    }
}

async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Envelope<UserResponse>> {
    let email = query
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("email query parameter is required".to_string()))?;

    let user = state
        .db
        .get_user_by_email(&email)
        .await
        .and_then(|user| {
            user.ok_or_else(|| AppError::NotFound(format!("user with email {email} not found")))
        })
        .map_err(|e| e.wrap("Error in getting user by email"))?;

    Ok(Envelope::ok(user.into()))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    IdPath(user_id): IdPath,
    ValidatedJson(mut patch): ValidatedJson<UserPatch>,
) -> Result<Envelope<UserResponse>> {
    if user_id != auth.user_id {
        tracing::warn!(
            user_id = %auth.user_id,
            target = %user_id,
            "Attempt to update another user"
        );
        return Err(AppError::Unauthorized(
            "Not allowed to update this user".to_string(),
        ));
    }

    // Read-modify-write; concurrent updates are last writer wins.
    let mut user = state
        .db
        .get_user(&user_id)
        .await
        .and_then(|user| {
            user.ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
        })
        .map_err(|e| e.wrap("Error in updating user"))?;

    patch.email = patch.email.as_deref().map(normalize_email);
    if let Some(email) = patch.email.as_deref().filter(|e| !e.is_empty()) {
        if email != user.email {
            let taken = state
                .db
                .get_user_by_email(email)
                .await
                .map_err(|e| e.wrap("Error in updating user"))?
                .is_some_and(|other| other.id != user.id);
            if taken {
                return Err(AppError::BadRequest(format!(
                    "Error in updating user: email {email} is already registered"
                )));
            }
        }
    }

    user.apply(patch, Utc::now());

    state
        .db
        .update_user(&user)
        .await
        .map_err(|e| e.wrap("Error in updating user"))?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(Envelope::ok(user.into()))
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<UploadImageRequest>,
) -> Result<Envelope<UploadedImage>> {
    let uploaded = state
        .cloudinary
        .upload(&req.image, req.folder.as_deref())
        .await
        .map_err(|e| e.wrap("Error in uploading image"))?;

    tracing::info!(user_id = %auth.user_id, public_id = %uploaded.public_id, "Image uploaded");

    Ok(Envelope::ok(uploaded))
}

async fn remove_image(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<RemoveImageRequest>,
) -> Result<Envelope<DestroyResult>> {
    let result = state
        .cloudinary
        .destroy(&req.public_id)
        .await
        .map_err(|e| e.wrap("Error in deleting image"))?;

    tracing::info!(user_id = %auth.user_id, public_id = %req.public_id, "Image removed");

    Ok(Envelope::ok(result))
}
