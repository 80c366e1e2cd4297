// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The deployment stage is read first; outside production a dotenv file is
//! loaded before the remaining variables are resolved.

use std::env;

/// Default upper bound for the consecutive-day streak walk (about ten years).
pub const DEFAULT_MAX_STREAK_DAYS: u32 = 3650;

/// Deployment stage, selected by the `STAGE` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Locally signed HS256 tokens are accepted instead of Firebase ID tokens.
    Test,
    Development,
    Production,
}

impl Stage {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Stage::Test,
            "production" => Stage::Production,
            _ => Stage::Development,
        }
    }

    pub fn from_env() -> Self {
        env::var("STAGE")
            .map(|v| Stage::parse(&v))
            .unwrap_or(Stage::Development)
    }

    /// Dotenv file loaded for this stage, if any.
    fn dotenv_file(self) -> Option<&'static str> {
        match self {
            Stage::Test => Some(".env.test"),
            Stage::Development => Some(".env"),
            Stage::Production => None,
        }
    }
}

/// Cloudinary account credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub stage: Stage,
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// GCP project hosting Firestore
    pub gcp_project_id: String,
    /// Firebase project (token audience and issuer suffix)
    pub firebase_project_id: String,
    /// Web API key for the Identity Toolkit REST API
    pub firebase_api_key: String,
    pub cloudinary: CloudinaryConfig,
    /// HS256 secret for test-stage tokens
    pub jwt_secret: Option<Vec<u8>>,
    /// Maximum number of days the streak walk will look back
    pub max_streak_days: u32,
}

impl Config {
    /// Config for tests only: test stage with a known JWT secret.
    pub fn test_default() -> Self {
        Self {
            stage: Stage::Test,
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            firebase_project_id: "test-project".to_string(),
            firebase_api_key: "test-api-key".to_string(),
            cloudinary: CloudinaryConfig {
                cloud_name: "test-cloud".to_string(),
                api_key: "test-cloudinary-key".to_string(),
                api_secret: "test-cloudinary-secret".to_string(),
            },
            jwt_secret: Some(b"test_jwt_key_32_bytes_minimum!!".to_vec()),
            max_streak_days: DEFAULT_MAX_STREAK_DAYS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let stage = Stage::from_env();
        if let Some(file) = stage.dotenv_file() {
            // A missing dotenv file is fine; variables may come from the process.
            dotenvy::from_filename(file).ok();
        }

        let gcp_project_id = required("GCP_PROJECT_ID")?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().as_bytes().to_vec()),
            _ if stage == Stage::Test => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => None,
        };

        let max_streak_days = match env::var("MAX_STREAK_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::Invalid("MAX_STREAK_DAYS", raw))?,
            Err(_) => DEFAULT_MAX_STREAK_DAYS,
        };

        Ok(Self {
            stage,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| gcp_project_id.clone()),
            gcp_project_id,
            firebase_api_key: required("FIREBASE_API_KEY")?,
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
            jwt_secret,
            max_streak_days,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
