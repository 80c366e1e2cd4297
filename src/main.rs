// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea Journal API Server

use idea_journal::{
    config::Config,
    db::FirestoreDb,
    services::{CloudinaryClient, FirebaseAuth},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        stage = ?config.stage,
        "Starting Idea Journal API"
    );

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let firebase = FirebaseAuth::new(&config)?;
    let cloudinary = CloudinaryClient::new(&config.cloudinary)?;
    tracing::info!(cloud = %config.cloudinary.cloud_name, "Cloudinary client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        firebase,
        cloudinary,
    });

    // Build router
    let app = idea_journal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("idea_journal=debug,info")),
        )
        .with(format)
        .init();
}
