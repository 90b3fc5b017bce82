// ABOUTME: Profile picture uploads to a remote media host with progress reporting
// ABOUTME: Upload validation, progress type, uploader trait, and the profile picture flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Media
//!
//! Images are validated locally, streamed to the media host while progress is
//! published on a `watch` channel, and the returned URL becomes the user's avatar.

/// Cloudinary unsigned upload client
#[cfg(feature = "cloudinary")]
pub mod cloudinary;

#[cfg(feature = "cloudinary")]
pub use cloudinary::CloudinaryUploader;

use crate::auth::{AuthSession, IdentityProvider, ProfileUpdate};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

/// Image selected by the user
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Owner; also the public id of the stored image
    pub user_id: String,
    /// Original file name
    pub file_name: String,
    /// MIME type reported for the file
    pub content_type: String,
    /// File contents
    pub data: Bytes,
}

impl ImageUpload {
    /// Size in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the file has no contents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the file type and size before any upload starts
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-image or empty file and `ValueOutOfRange`
    /// when larger than `max_bytes`
    pub fn validate(&self, max_bytes: u64) -> AppResult<()> {
        if !self.content_type.starts_with("image/") {
            return Err(AppError::invalid_input(
                "Please upload an image file (JPEG, PNG)",
            ));
        }
        if self.is_empty() {
            return Err(AppError::invalid_input("The selected file is empty"));
        }
        if self.len() > max_bytes {
            let max_mib = max_bytes / (1024 * 1024);
            return Err(AppError::value_out_of_range(format!(
                "File size should be less than {max_mib}MB"
            )));
        }
        Ok(())
    }
}

/// Bytes handed to the transport so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    /// Bytes sent
    pub sent: u64,
    /// Total bytes to send
    pub total: u64,
}

impl UploadProgress {
    /// Rounded percentage; zero while the total is unknown
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let sent = self.sent.min(self.total);
        ((sent * 100 + self.total / 2) / self.total) as u8
    }

    /// Whether every byte was sent
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.sent >= self.total
    }
}

/// Stored image location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedMedia {
    /// HTTPS URL of the stored image
    pub url: String,
}

/// Remote image host
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload `upload`, publishing progress on `progress`
    async fn upload(
        &self,
        upload: ImageUpload,
        progress: watch::Sender<UploadProgress>,
    ) -> AppResult<UploadedMedia>;
}

/// Upload a new avatar and point the signed-in user's profile at it
///
/// # Errors
///
/// Returns `AuthRequired` when signed out, or the uploader's or identity
/// provider's error; the profile is unchanged when the upload fails
pub async fn replace_profile_picture(
    uploader: &dyn MediaUploader,
    identity: &dyn IdentityProvider,
    session: &mut AuthSession,
    mut upload: ImageUpload,
    progress: watch::Sender<UploadProgress>,
) -> AppResult<UploadedMedia> {
    let user_id = session.require_user()?.user_id.clone();
    upload.user_id.clone_from(&user_id);

    let media = uploader.upload(upload, progress).await?;
    identity
        .update_profile(session, &ProfileUpdate::photo(media.url.clone()))
        .await?;
    info!(%user_id, url = %media.url, "Profile picture updated");
    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::media::MAX_UPLOAD_BYTES;
    use crate::errors::ErrorCode;

    fn image(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            user_id: "uid-1".to_owned(),
            file_name: "me.png".to_owned(),
            content_type: content_type.to_owned(),
            data: Bytes::from(vec![0_u8; size]),
        }
    }

    #[test]
    fn test_validate_type_and_size() {
        assert!(image("image/png", 1024).validate(MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            image("application/pdf", 1024)
                .validate(MAX_UPLOAD_BYTES)
                .unwrap_err()
                .code,
            ErrorCode::InvalidInput
        );
        let too_big = image("image/jpeg", MAX_UPLOAD_BYTES as usize + 1);
        let err = too_big.validate(MAX_UPLOAD_BYTES).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.message, "File size should be less than 5MB");
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(UploadProgress::default().percent(), 0);
        let half = UploadProgress { sent: 50, total: 100 };
        assert_eq!(half.percent(), 50);
        assert!(!half.is_complete());
        let done = UploadProgress { sent: 3, total: 3 };
        assert_eq!(done.percent(), 100);
        assert!(done.is_complete());
        assert_eq!(UploadProgress { sent: 1, total: 3 }.percent(), 33);
    }
}
