// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::envelope::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application error type that converts to HTTP responses.
///
/// Downstream failures surface as 400 with the wrapped message, and a missing
/// record is not distinguished from them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Database(String),

    #[error("{0}")]
    IdentityProvider(String),

    #[error("{0}")]
    ImageHost(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Prefix the error message with handler context, keeping the variant.
    pub fn wrap(self, context: &str) -> Self {
        match self {
            AppError::Unauthorized(msg) => AppError::Unauthorized(format!("{context}: {msg}")),
            AppError::BadRequest(msg) => AppError::BadRequest(format!("{context}: {msg}")),
            AppError::NotFound(msg) => AppError::NotFound(format!("{context}: {msg}")),
            AppError::Database(msg) => AppError::Database(format!("{context}: {msg}")),
            AppError::IdentityProvider(msg) => {
                AppError::IdentityProvider(format!("{context}: {msg}"))
            }
            AppError::ImageHost(msg) => AppError::ImageHost(format!("{context}: {msg}")),
            AppError::Internal(err) => AppError::Internal(err.context(context.to_string())),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::Database(_)
            | AppError::IdentityProvider(_)
            | AppError::ImageHost(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Database(msg) => tracing::error!(error = %msg, "Database error"),
            AppError::IdentityProvider(msg) => {
                tracing::error!(error = %msg, "Identity provider error")
            }
            AppError::ImageHost(msg) => tracing::error!(error = %msg, "Image host error"),
            AppError::Internal(err) => tracing::error!(error = %err, "Internal server error"),
            AppError::Unauthorized(msg) => tracing::debug!(reason = %msg, "Unauthorized"),
            AppError::BadRequest(_) | AppError::NotFound(_) => {}
        }

        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        Envelope::failure(status, message).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_wrap_keeps_variant() {
        let err = AppError::NotFound("idea abc not found".into()).wrap("Error in getting idea");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Error in getting idea: idea abc not found");

        let err = AppError::Unauthorized("no token".into()).wrap("Auth");
        assert_eq!(err.to_string(), "Auth: no token");
    }
}
