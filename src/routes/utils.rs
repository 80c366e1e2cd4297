// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public utility routes: client error reporting and health check.

use crate::envelope::Envelope;
use crate::extractors::ValidatedJson;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/error-message", post(log_client_error))
        .route("/api/error-message/", post(log_client_error))
        .route("/api/healthcheck", get(health_check))
        .route("/api/error-message/healthcheck", get(health_check))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClientErrorRequest {
    #[validate(length(max = 10000))]
    pub message: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Record an error reported by the frontend.
async fn log_client_error(
    ValidatedJson(req): ValidatedJson<ClientErrorRequest>,
) -> Envelope<()> {
    tracing::warn!(client_message = %req.message, "Client error reported");
    Envelope::empty()
}

async fn health_check() -> Envelope<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Envelope::ok(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}
