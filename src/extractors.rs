// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request extractors that reject with the JSON envelope instead of plain text.

use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that is deserialized and then checked with `validator` rules.
///
/// Malformed bodies and rule violations both become a 400 envelope.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::BadRequest(format!(
                    "Request body is not valid: {}",
                    rejection.body_text()
                ))
            })?;

        value
            .validate()
            .map_err(|e| AppError::BadRequest(format!("Request body is not valid: {e}")))?;

        Ok(Self(value))
    }
}

/// Single `{id}` path segment that must be a UUID.
#[derive(Debug, Clone)]
pub struct IdPath(pub String);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let id = uuid::Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))?;

        Ok(Self(id.to_string()))
    }
}
