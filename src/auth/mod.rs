// ABOUTME: Identity provider abstraction with the signed-in session and form validation
// ABOUTME: Sign-in, sign-up, profile and password changes behind an async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Authentication
//!
//! Credentials are checked by an external identity provider. The application only
//! needs the signed-in user's id, held by [`AuthSession`]. Every request type
//! validates its form rules locally before any remote call is made.

/// Firebase Identity Toolkit client
#[cfg(feature = "firebase")]
pub mod firebase;
/// Process-local identity provider
pub mod memory;

#[cfg(feature = "firebase")]
pub use firebase::FirebaseIdentityClient;
pub use memory::InMemoryIdentityProvider;

use crate::constants::auth::MIN_PASSWORD_LEN;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Stable identifier used as the document key
    pub user_id: String,
    /// Sign-in email
    pub email: String,
    /// Name shown in the profile header
    pub display_name: Option<String>,
    /// Avatar image URL
    pub photo_url: Option<String>,
    /// Bearer token for document store requests
    #[serde(skip_serializing, default)]
    pub id_token: String,
}

/// Who is signed in, if anyone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    user: Option<AuthenticatedUser>,
}

impl AuthSession {
    /// Session for `user`
    #[must_use]
    pub const fn signed_in(user: AuthenticatedUser) -> Self {
        Self { user: Some(user) }
    }

    /// Id of the signed-in user
    #[must_use]
    pub fn current_user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.user_id.as_str())
    }

    /// Whether someone is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Signed-in user, if any
    #[must_use]
    pub const fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    /// Signed-in user
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when signed out
    pub fn require_user(&self) -> AppResult<&AuthenticatedUser> {
        self.user.as_ref().ok_or_else(AppError::auth_required)
    }

    /// Mutable access to the signed-in user
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when signed out
    pub fn require_user_mut(&mut self) -> AppResult<&mut AuthenticatedUser> {
        self.user.as_mut().ok_or_else(AppError::auth_required)
    }

    /// Replace the signed-in user
    pub fn set_user(&mut self, user: AuthenticatedUser) {
        self.user = Some(user);
    }

    /// Forget the signed-in user
    pub fn clear(&mut self) {
        self.user = None;
    }
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Name stored on the new profile
    pub display_name: String,
    /// Sign-in email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Repeated password
    pub confirm_password: String,
}

impl SignUpRequest {
    /// Check the form rules
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name, or `InvalidInput` for a
    /// malformed email, a short password or a mismatched confirmation
    pub fn validate(&self) -> AppResult<()> {
        if self.display_name.trim().is_empty() {
            return Err(AppError::missing_field("displayName"));
        }
        validate_email(&self.email)?;
        validate_new_password(&self.password, &self.confirm_password)
    }
}

/// Profile edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name
    pub display_name: Option<String>,
    /// New avatar URL
    pub photo_url: Option<String>,
    /// New sign-in email
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Only change the avatar
    #[must_use]
    pub fn photo(url: impl Into<String>) -> Self {
        Self {
            photo_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Whether nothing would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none() && self.email.is_none()
    }

    /// Check the form rules
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for a blank display name or `InvalidInput`
    /// for a malformed email
    pub fn validate(&self) -> AppResult<()> {
        if self
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AppError::missing_field("displayName"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Copy the changed fields onto `user`
    pub fn apply_to(&self, user: &mut AuthenticatedUser) {
        if let Some(name) = &self.display_name {
            user.display_name = Some(name.clone());
        }
        if let Some(url) = &self.photo_url {
            user.photo_url = Some(url.clone());
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
    }
}

/// Password change form; the current password is re-checked first
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Password in use now
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
    /// Repeated replacement
    pub confirm_password: String,
}

impl PasswordChange {
    /// Check the form rules
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without the current password, or
    /// `InvalidInput` for a short or mismatched new password
    pub fn validate(&self) -> AppResult<()> {
        if self.current_password.is_empty() {
            return Err(AppError::missing_field("currentPassword"));
        }
        validate_new_password(&self.new_password, &self.confirm_password)
    }
}

/// Rules shared by sign-up and password change
///
/// # Errors
///
/// Returns `InvalidInput` when the confirmation differs or the password is too short
pub fn validate_new_password(password: &str, confirmation: &str) -> AppResult<()> {
    if password != confirmation {
        return Err(AppError::invalid_input("Passwords don't match"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Minimal email shape check; the provider has the final say
///
/// # Errors
///
/// Returns `InvalidInput` unless there is text on both sides of an `@`
pub fn validate_email(email: &str) -> AppResult<()> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::invalid_input(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

/// External account service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check credentials and return the user's profile
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser>;

    /// Create an account with a display name and return its profile
    async fn sign_up(&self, request: &SignUpRequest) -> AppResult<AuthenticatedUser>;

    /// Change profile fields of the signed-in user and refresh the session
    async fn update_profile(&self, session: &mut AuthSession, update: &ProfileUpdate)
        -> AppResult<()>;

    /// Re-check the current password, then set the new one
    async fn change_password(&self, session: &mut AuthSession, change: &PasswordChange)
        -> AppResult<()>;

    /// End the session
    async fn sign_out(&self, session: &mut AuthSession) -> AppResult<()> {
        session.clear();
        Ok(())
    }
}
