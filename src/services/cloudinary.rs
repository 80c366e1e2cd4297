// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloudinary image host client (signed upload and destroy).

use crate::config::CloudinaryConfig;
use crate::error::AppError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[serde(alias = "public_id")]
    pub public_id: String,
    pub url: String,
    #[serde(alias = "secure_url")]
    pub secure_url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Result of a destroy call (`"ok"` or `"not found"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestroyResult {
    pub result: String,
}

#[derive(Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryErrorBody,
}

#[derive(Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Signed REST client for one Cloudinary account.
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn new(config: &CloudinaryConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building Cloudinary HTTP client")?;

        Ok(Self {
            http_client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    /// Upload an image given as a data URI or remote URL into `folder`.
    pub async fn upload(&self, image: &str, folder: Option<&str>) -> Result<UploadedImage, AppError> {
        let mut params = BTreeMap::new();
        if let Some(folder) = folder.filter(|f| !f.is_empty()) {
            params.insert("folder", folder.to_string());
        }

        let uploaded: UploadedImage = self.signed_call("upload", params, Some(image)).await?;

        tracing::info!(public_id = %uploaded.public_id, "Uploaded image");
        Ok(uploaded)
    }

    /// Delete an uploaded image by its public id.
    pub async fn destroy(&self, public_id: &str) -> Result<DestroyResult, AppError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());

        let result: DestroyResult = self.signed_call("destroy", params, None).await?;

        tracing::info!(public_id, result = %result.result, "Destroyed image");
        Ok(result)
    }

    async fn signed_call<R>(
        &self,
        action: &str,
        mut params: BTreeMap<&'static str, String>,
        file: Option<&str>,
    ) -> Result<R, AppError>
    where
        R: serde::de::DeserializeOwned,
    {
        params.insert("timestamp", unix_timestamp().to_string());
        let signature = sign(&params, &self.api_secret);

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature", signature));
        if let Some(file) = file {
            form.push(("file", file.to_string()));
        }

        let url = format!("{}/{}/image/{}", API_BASE_URL, self.cloud_name, action);

        let response = self
            .http_client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ImageHost(format!("{action} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CloudinaryErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::warn!(action, status = %status, error = %message, "Cloudinary call failed");
            return Err(AppError::ImageHost(message));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ImageHost(format!("invalid {action} response: {e}")))
    }
}

/// Request signature: hex SHA-1 of the sorted `key=value` pairs joined by `&`,
/// followed by the API secret.
fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha1::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
