// ABOUTME: Firebase Identity Toolkit REST client for email and password accounts
// ABOUTME: Maps provider error codes onto the application error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! Firebase email/password authentication
//!
//! Uses the public Identity Toolkit endpoints with the web API key:
//! - `accounts:signInWithPassword` to check credentials
//! - `accounts:signUp` to create an account
//! - `accounts:update` to change profile fields, email or password
//! - `accounts:lookup` to read the profile after sign-in

use super::{
    AuthSession, AuthenticatedUser, IdentityProvider, PasswordChange, ProfileUpdate,
    SignUpRequest,
};
use crate::config::FirebaseConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::utils::http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

const SERVICE: &str = "firebase-auth";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

/// Identity provider backed by Firebase Authentication
#[derive(Clone)]
pub struct FirebaseIdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentityClient {
    /// Create a client from Firebase configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no API key is configured
    pub fn new(config: &FirebaseConfig) -> AppResult<Self> {
        Self::with_client(config, http_client::auth_client())
    }

    /// Create a client using the given HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no API key is configured
    pub fn with_client(config: &FirebaseConfig, client: Client) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config_missing("FIREBASE_API_KEY"))?;
        Ok(Self {
            client,
            base_url: config.identity_base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    fn endpoint(&self, method: &str) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/accounts:{method}", self.base_url)).map_err(|e| {
            AppError::config(format!(
                "Invalid FIREBASE_AUTH_BASE_URL '{}': {e}",
                self.base_url
            ))
        })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> AppResult<T> {
        let response = self
            .client
            .post(self.endpoint(method)?)
            .json(body)
            .send()
            .await
            .map_err(|e| http_client::transport_error(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let code = provider_error_code(&text);
            warn!(method, status = status.as_u16(), %code, "Identity Toolkit request rejected");
            return Err(map_provider_error(&code));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Malformed {method} response"))
                .with_source(e)
        })
    }

    async fn lookup_profile(&self, id_token: &str) -> AppResult<Option<LookupUser>> {
        let response: LookupResponse = self
            .call("lookup", &json!({ "idToken": id_token }))
            .await?;
        Ok(response.users.into_iter().next())
    }
}

/// Provider code from an Identity Toolkit error body
///
/// Messages look like `WEAK_PASSWORD : Password should be at least 6 characters`;
/// only the leading code is kept.
fn provider_error_code(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .and_then(|message| message.split(" : ").next())
                .map(|code| code.trim().to_owned())
        })
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_owned())
}

/// Map an Identity Toolkit error code onto an application error
fn map_provider_error(code: &str) -> AppError {
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AppError::auth_invalid("Invalid email or password")
        }
        "USER_DISABLED" => AppError::auth_invalid("This account has been disabled"),
        "EMAIL_EXISTS" => AppError::already_exists("An account with this email already exists"),
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" => {
            AppError::auth_expired("Please sign in again to continue")
        }
        "WEAK_PASSWORD" => AppError::invalid_input("Password is too weak"),
        other => AppError::external_service(SERVICE, format!("Identity provider error: {other}")),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let result: AppResult<TokenResponse> = self
            .call(
                "signInWithPassword",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await;
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                AppLogger::log_auth_event("", "sign_in", false);
                return Err(e);
            }
        };

        // A failed lookup only costs the avatar; the credentials were accepted
        let profile = match self.lookup_profile(&token.id_token).await {
            Ok(profile) => profile,
            Err(e) => {
                debug!(error = %e, "Profile lookup after sign-in failed");
                None
            }
        };

        AppLogger::log_auth_event(&token.local_id, "sign_in", true);
        let (display_name, photo_url) = profile.map_or((token.display_name, None), |profile| {
            (profile.display_name, profile.photo_url)
        });
        Ok(AuthenticatedUser {
            user_id: token.local_id,
            email: token.email,
            display_name,
            photo_url,
            id_token: token.id_token,
        })
    }

    async fn sign_up(&self, request: &SignUpRequest) -> AppResult<AuthenticatedUser> {
        request.validate()?;
        let token: TokenResponse = self
            .call(
                "signUp",
                &json!({
                    "email": request.email.trim(),
                    "password": request.password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let display_name = request.display_name.trim().to_owned();
        let updated: UpdateResponse = self
            .call(
                "update",
                &json!({
                    "idToken": token.id_token,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        AppLogger::log_auth_event(&token.local_id, "sign_up", true);
        Ok(AuthenticatedUser {
            user_id: token.local_id,
            email: token.email,
            display_name: Some(display_name),
            photo_url: None,
            id_token: updated.id_token.unwrap_or(token.id_token),
        })
    }

    async fn update_profile(
        &self,
        session: &mut AuthSession,
        update: &ProfileUpdate,
    ) -> AppResult<()> {
        update.validate()?;
        if update.is_empty() {
            return Ok(());
        }
        let user = session.require_user_mut()?;

        let mut body = json!({ "idToken": user.id_token, "returnSecureToken": true });
        if let Some(name) = &update.display_name {
            body["displayName"] = json!(name.trim());
        }
        if let Some(url) = &update.photo_url {
            body["photoUrl"] = json!(url);
        }
        if let Some(email) = &update.email {
            body["email"] = json!(email.trim());
        }

        let response: UpdateResponse = self.call("update", &body).await.map_err(|e| {
            AppLogger::log_auth_event(&user.user_id, "update_profile", false);
            e.with_user_id(user.user_id.clone())
        })?;

        update.apply_to(user);
        if let Some(id_token) = response.id_token {
            user.id_token = id_token;
        }
        AppLogger::log_auth_event(&user.user_id, "update_profile", true);
        Ok(())
    }

    async fn change_password(
        &self,
        session: &mut AuthSession,
        change: &PasswordChange,
    ) -> AppResult<()> {
        change.validate()?;
        let user = session.require_user_mut()?;

        let fresh = self
            .sign_in(&user.email, &change.current_password)
            .await
            .map_err(|e| match e.code {
                ErrorCode::AuthInvalid => {
                    AppError::auth_invalid("Current password is incorrect")
                }
                _ => e,
            })?;

        let response: UpdateResponse = self
            .call(
                "update",
                &json!({
                    "idToken": fresh.id_token,
                    "password": change.new_password,
                    "returnSecureToken": true,
                }),
            )
            .await
            .map_err(|e| e.with_user_id(user.user_id.clone()))?;

        user.id_token = response.id_token.unwrap_or(fresh.id_token);
        AppLogger::log_auth_event(&user.user_id, "change_password", true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FirebaseConfig {
        FirebaseConfig {
            project_id: Some("bodyplan-test".to_owned()),
            api_key: Some("web-key".to_owned()),
            ..FirebaseConfig::default()
        }
    }

    #[test]
    fn test_endpoint_carries_api_key() {
        let client = FirebaseIdentityClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint("signUp").unwrap().as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=web-key"
        );
    }

    #[test]
    fn test_requires_api_key() {
        let config = FirebaseConfig {
            api_key: None,
            ..config()
        };
        let Err(err) = FirebaseIdentityClient::new(&config) else {
            panic!("client built without an API key");
        };
        assert_eq!(err.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_error_code_extraction() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        assert_eq!(provider_error_code(body), "WEAK_PASSWORD");
        assert_eq!(provider_error_code("<html>bad gateway</html>"), "UNKNOWN");
        assert_eq!(
            provider_error_code(r#"{"error":{"message":"QUOTA_EXCEEDED"}}"#),
            "QUOTA_EXCEEDED"
        );
    }

    #[test]
    fn test_error_mapping() {
        let cases = [
            ("EMAIL_NOT_FOUND", ErrorCode::AuthInvalid),
            ("INVALID_PASSWORD", ErrorCode::AuthInvalid),
            ("INVALID_LOGIN_CREDENTIALS", ErrorCode::AuthInvalid),
            ("EMAIL_EXISTS", ErrorCode::ResourceAlreadyExists),
            ("CREDENTIAL_TOO_OLD_LOGIN_AGAIN", ErrorCode::AuthExpired),
            ("TOKEN_EXPIRED", ErrorCode::AuthExpired),
            ("WEAK_PASSWORD", ErrorCode::InvalidInput),
            ("UNKNOWN", ErrorCode::ExternalServiceError),
        ];
        for (code, expected) in cases {
            assert_eq!(map_provider_error(code).code, expected, "{code}");
        }
    }
}
