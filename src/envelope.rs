// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Uniform `{status_code, message, success, data}` response wrapper.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Every API response body is wrapped in an envelope.
///
/// Success envelopes carry `data` and an empty `message`; failure envelopes
/// carry the error text in `message` and `null` data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: String::new(),
            success: true,
            data: Some(data),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }
}

impl Envelope<()> {
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            success: false,
            data: None,
        }
    }

    /// Success with `null` data.
    pub fn empty() -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: String::new(),
            success: true,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
