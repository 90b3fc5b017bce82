// ABOUTME: Identity provider keeping accounts in process memory
// ABOUTME: Used with the in-memory document store for local runs and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::{
    AuthSession, AuthenticatedUser, IdentityProvider, PasswordChange, ProfileUpdate,
    SignUpRequest,
};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: AuthenticatedUser,
}

/// Accounts keyed by lowercase email
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryIdentityProvider {
    /// Provider with no accounts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no account exists
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    async fn check_password(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let accounts = self.accounts.read().await;
        match accounts.get(&normalize(email)) {
            Some(account) if account.password == password => Ok(account.user.clone()),
            _ => Err(AppError::auth_invalid("Invalid email or password")),
        }
    }

    async fn account_key(&self, user_id: &str) -> AppResult<String> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|(_, account)| account.user.user_id == user_id)
            .map(|(email, _)| email.clone())
            .ok_or_else(|| AppError::auth_expired("Account no longer exists, sign in again"))
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let result = self.check_password(email, password).await;
        let user_id = result.as_ref().map_or("", |user| user.user_id.as_str());
        AppLogger::log_auth_event(user_id, "sign_in", result.is_ok());
        result.map(|user| AuthenticatedUser {
            id_token: issue_token(),
            ..user
        })
    }

    async fn sign_up(&self, request: &SignUpRequest) -> AppResult<AuthenticatedUser> {
        request.validate()?;
        let key = normalize(&request.email);

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AppError::already_exists(
                "An account with this email already exists",
            ));
        }

        let user = AuthenticatedUser {
            user_id: Uuid::new_v4().to_string(),
            email: request.email.trim().to_owned(),
            display_name: Some(request.display_name.trim().to_owned()),
            photo_url: None,
            id_token: issue_token(),
        };
        accounts.insert(
            key,
            Account {
                password: request.password.clone(),
                user: user.clone(),
            },
        );
        AppLogger::log_auth_event(&user.user_id, "sign_up", true);
        Ok(user)
    }

    async fn update_profile(
        &self,
        session: &mut AuthSession,
        update: &ProfileUpdate,
    ) -> AppResult<()> {
        update.validate()?;
        let user = session.require_user_mut()?;
        let key = self.account_key(&user.user_id).await?;

        let mut accounts = self.accounts.write().await;
        let new_key = update.email.as_deref().map(normalize);
        if let Some(new_key) = new_key.as_ref().filter(|new_key| **new_key != key) {
            if accounts.contains_key(new_key) {
                return Err(AppError::already_exists(
                    "An account with this email already exists",
                ));
            }
        }

        let Some(mut account) = accounts.remove(&key) else {
            return Err(AppError::auth_expired("Account no longer exists, sign in again"));
        };
        update.apply_to(&mut account.user);
        update.apply_to(user);
        accounts.insert(new_key.unwrap_or(key), account);
        AppLogger::log_auth_event(&user.user_id, "update_profile", true);
        Ok(())
    }

    async fn change_password(
        &self,
        session: &mut AuthSession,
        change: &PasswordChange,
    ) -> AppResult<()> {
        change.validate()?;
        let user = session.require_user()?;
        self.check_password(&user.email, &change.current_password)
            .await
            .map_err(|_| AppError::auth_invalid("Current password is incorrect"))?;

        let key = normalize(&user.email);
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&key)
            .ok_or_else(|| AppError::auth_expired("Account no longer exists, sign in again"))?;
        account.password.clone_from(&change.new_password);
        AppLogger::log_auth_event(&user.user_id, "change_password", true);
        Ok(())
    }
}
