// ABOUTME: Integration tests for account flows and the profile picture upload
// ABOUTME: Uses the in-memory identity provider and a scripted media uploader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use bodyplan::auth::{
    AuthSession, IdentityProvider, InMemoryIdentityProvider, PasswordChange, ProfileUpdate,
    SignUpRequest,
};
use bodyplan::errors::{AppError, AppResult, ErrorCode};
use bodyplan::media::{
    replace_profile_picture, ImageUpload, MediaUploader, UploadProgress, UploadedMedia,
};
use bytes::Bytes;
use tokio::sync::watch;

fn sign_up_form(password: &str, confirm: &str) -> SignUpRequest {
    SignUpRequest {
        display_name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password: password.to_owned(),
        confirm_password: confirm.to_owned(),
    }
}

async fn signed_in() -> (InMemoryIdentityProvider, AuthSession) {
    common::init_test_logging();
    let provider = InMemoryIdentityProvider::new();
    let user = provider
        .sign_up(&sign_up_form("secret1", "secret1"))
        .await
        .unwrap();
    (provider, AuthSession::signed_in(user))
}

struct ScriptedUploader {
    result: Result<String, ErrorCode>,
}

#[async_trait]
impl MediaUploader for ScriptedUploader {
    async fn upload(
        &self,
        upload: ImageUpload,
        progress: watch::Sender<UploadProgress>,
    ) -> AppResult<UploadedMedia> {
        upload.validate(5 * 1024 * 1024)?;
        let total = upload.len();
        progress.send_replace(UploadProgress { sent: total, total });
        match &self.result {
            Ok(url) => Ok(UploadedMedia {
                url: format!("{url}/{}", upload.user_id),
            }),
            Err(code) => Err(AppError::new(*code, "Upload failed")),
        }
    }
}

fn avatar() -> ImageUpload {
    ImageUpload {
        user_id: String::new(),
        file_name: "avatar.png".to_owned(),
        content_type: "image/png".to_owned(),
        data: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
    }
}

#[tokio::test]
async fn test_sign_up_validation_blocks_remote_call() {
    let provider = InMemoryIdentityProvider::new();

    let err = provider
        .sign_up(&sign_up_form("secret1", "secret2"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.is_validation());

    let err = provider
        .sign_up(&sign_up_form("abc", "abc"))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Password must be at least 6 characters");
    assert!(provider.is_empty().await);
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let (provider, mut session) = signed_in().await;
    assert!(session.is_authenticated());

    provider.sign_out(&mut session).await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(
        session.require_user().unwrap_err().code,
        ErrorCode::AuthRequired
    );
}

#[tokio::test]
async fn test_change_password_checks_current_password() {
    let (provider, mut session) = signed_in().await;

    let wrong = PasswordChange {
        current_password: "nope".to_owned(),
        new_password: "secret2".to_owned(),
        confirm_password: "secret2".to_owned(),
    };
    let err = provider
        .change_password(&mut session, &wrong)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Current password is incorrect");

    let change = PasswordChange {
        current_password: "secret1".to_owned(),
        ..wrong
    };
    provider.change_password(&mut session, &change).await.unwrap();
    assert!(provider.sign_in("ada@example.com", "secret2").await.is_ok());
    assert_eq!(
        provider
            .sign_in("ada@example.com", "secret1")
            .await
            .unwrap_err()
            .code,
        ErrorCode::AuthInvalid
    );
}

#[tokio::test]
async fn test_profile_update_requires_session() {
    let provider = InMemoryIdentityProvider::new();
    let mut session = AuthSession::default();
    let err = provider
        .update_profile(&mut session, &ProfileUpdate::photo("https://example.com/a.png"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
}

#[tokio::test]
async fn test_profile_picture_upload_updates_avatar() {
    let (provider, mut session) = signed_in().await;
    let uploader = ScriptedUploader {
        result: Ok("https://res.example.com/profile_pictures".to_owned()),
    };
    let (progress, watcher) = watch::channel(UploadProgress::default());

    let media = replace_profile_picture(&uploader, &provider, &mut session, avatar(), progress)
        .await
        .unwrap();

    let user = session.user().unwrap();
    assert_eq!(media.url, format!("https://res.example.com/profile_pictures/{}", user.user_id));
    assert_eq!(user.photo_url.as_deref(), Some(media.url.as_str()));
    assert_eq!(watcher.borrow().percent(), 100);
}

#[tokio::test]
async fn test_failed_upload_keeps_profile() {
    let (provider, mut session) = signed_in().await;
    let uploader = ScriptedUploader {
        result: Err(ErrorCode::ExternalServiceUnavailable),
    };
    let (progress, _watcher) = watch::channel(UploadProgress::default());

    let err = replace_profile_picture(&uploader, &provider, &mut session, avatar(), progress)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(session.user().unwrap().photo_url, None);
}

#[tokio::test]
async fn test_non_image_rejected_before_upload() {
    let (provider, mut session) = signed_in().await;
    let uploader = ScriptedUploader {
        result: Ok("https://res.example.com".to_owned()),
    };
    let (progress, watcher) = watch::channel(UploadProgress::default());
    let upload = ImageUpload {
        content_type: "application/pdf".to_owned(),
        ..avatar()
    };

    let err = replace_profile_picture(&uploader, &provider, &mut session, upload, progress)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(*watcher.borrow(), UploadProgress::default());
}
