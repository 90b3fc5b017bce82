// ABOUTME: Cloudinary unsigned image upload over multipart HTTP
// ABOUTME: Streams the file in chunks so upload progress can be reported as it is sent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::{ImageUpload, MediaUploader, UploadProgress, UploadedMedia};
use crate::config::CloudinaryConfig;
use crate::constants::media::{PROFILE_PICTURE_TAGS, UPLOAD_CHUNK_BYTES};
use crate::errors::{AppError, AppResult};
use crate::utils::http_client;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{info, instrument, warn};
use url::Url;

const SERVICE: &str = "cloudinary";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Unsigned uploads into one Cloudinary folder
#[derive(Clone)]
pub struct CloudinaryUploader {
    client: Client,
    endpoint: Url,
    upload_preset: String,
    folder: String,
    max_upload_bytes: u64,
}

impl CloudinaryUploader {
    /// Create an uploader from Cloudinary configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a cloud name or upload preset
    pub fn new(config: &CloudinaryConfig) -> AppResult<Self> {
        Self::with_client(config, http_client::upload_client())
    }

    /// Create an uploader using the given HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a cloud name or upload preset, or a
    /// configuration error for a bad base URL
    pub fn with_client(config: &CloudinaryConfig, client: Client) -> AppResult<Self> {
        let cloud_name = config
            .cloud_name
            .as_deref()
            .ok_or_else(|| AppError::config_missing("CLOUDINARY_CLOUD_NAME"))?;
        let upload_preset = config
            .upload_preset
            .clone()
            .ok_or_else(|| AppError::config_missing("CLOUDINARY_UPLOAD_PRESET"))?;

        let base = config.api_base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/{cloud_name}/image/upload")).map_err(|e| {
            AppError::config(format!("Invalid CLOUDINARY_BASE_URL '{base}': {e}"))
        })?;

        Ok(Self {
            client,
            endpoint,
            upload_preset,
            folder: config.folder.clone(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Upload endpoint
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Split `data` into transport chunks, bumping `progress` as each is taken
fn progress_stream(
    data: &Bytes,
    progress: Arc<watch::Sender<UploadProgress>>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(UPLOAD_CHUNK_BYTES)
        .map(|start| data.slice(start..data.len().min(start + UPLOAD_CHUNK_BYTES)))
        .collect();

    stream::iter(chunks).map(move |chunk| {
        progress.send_modify(|current| {
            current.sent = current.total.min(current.sent + chunk.len() as u64);
        });
        Ok(chunk)
    })
}

fn upload_error(status: reqwest::StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| status.to_string());

    if status.is_server_error() {
        AppError::external_unavailable(SERVICE, format!("Upload failed: {message}"))
    } else {
        AppError::external_service(SERVICE, format!("Upload failed: {message}"))
    }
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    #[instrument(skip_all, fields(user_id = %upload.user_id, bytes = upload.len()))]
    async fn upload(
        &self,
        upload: ImageUpload,
        progress: watch::Sender<UploadProgress>,
    ) -> AppResult<UploadedMedia> {
        upload.validate(self.max_upload_bytes)?;

        let total = upload.len();
        progress.send_replace(UploadProgress { sent: 0, total });
        let progress = Arc::new(progress);

        let body = Body::wrap_stream(progress_stream(&upload.data, Arc::clone(&progress)));
        let file = Part::stream_with_length(body, total)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| {
                AppError::invalid_input(format!(
                    "Unsupported content type '{}'",
                    upload.content_type
                ))
                .with_source(e)
            })?;
        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone())
            .text("public_id", upload.user_id.clone())
            .text("tags", PROFILE_PICTURE_TAGS);

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| http_client::transport_error(SERVICE, e).with_user_id(upload.user_id.clone()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Image upload rejected");
            return Err(upload_error(status, &body).with_user_id(upload.user_id));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE, "Upload response had no secure_url").with_source(e)
        })?;
        progress.send_modify(|current| current.sent = current.total);
        info!(
            duration_ms = started.elapsed().as_millis(),
            "Image uploaded"
        );
        Ok(UploadedMedia {
            url: uploaded.secure_url,
        })
    }
}
