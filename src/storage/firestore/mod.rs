// ABOUTME: Firestore document store over the REST API
// ABOUTME: Reads and writes per-user documents with a bearer id token and typed value codec
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

/// JSON to Firestore typed value conversion
pub mod codec;

use super::{Collection, Document, DocumentKey, DocumentStore};
use crate::config::FirebaseConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::utils::http_client;
use codec::{decode_fields, encode_fields};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

const SERVICE: &str = "firestore";

/// Firestore-backed document store
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    client: Client,
    base_url: Url,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
    id_token: Arc<RwLock<Option<String>>>,
}

impl FirestoreDocumentStore {
    /// Create a store from Firebase configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a project ID, or a configuration error for a bad base URL
    pub fn new(config: &FirebaseConfig) -> AppResult<Self> {
        Self::with_client(config, http_client::document_client())
    }

    /// Create a store using the given HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without a project ID, or a configuration error for a bad base URL
    pub fn with_client(config: &FirebaseConfig, client: Client) -> AppResult<Self> {
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| AppError::config_missing("FIREBASE_PROJECT_ID"))?;
        let base_url = Url::parse(&config.firestore_base_url).map_err(|e| {
            AppError::config(format!(
                "Invalid FIRESTORE_BASE_URL '{}': {e}",
                config.firestore_base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "FIRESTORE_BASE_URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url,
            project_id,
            database_id: config.database_id.clone(),
            api_key: config.api_key.clone(),
            id_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Install or clear the id token sent with every request
    ///
    /// Clones of the store share the token.
    pub async fn set_id_token(&self, id_token: Option<String>) {
        *self.id_token.write().await = id_token;
    }

    fn documents_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
                "documents",
            ]);
            path.extend(segments);
        }
        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", api_key);
        }
        url
    }

    fn document_url(&self, key: &DocumentKey) -> Url {
        self.documents_url(&[key.collection.as_str(), key.user_id.as_str()])
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let id_token = self.id_token.read().await.clone();
        match id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, key: &DocumentKey) -> AppResult<Response> {
        self.authorize(request)
            .await
            .send()
            .await
            .map_err(|e| {
                AppError::storage_unavailable(format!("Firestore request for {key} failed"))
                    .with_user_id(key.user_id.clone())
                    .with_source(e)
            })
    }
}

/// Field paths that are not plain identifiers must be quoted with backticks
fn field_path(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Map a non-success HTTP status to the store error taxonomy
fn status_error(status: StatusCode, body: &str, key: &DocumentKey) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| status.to_string());

    let error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::permission_denied(format!("Access to {key} denied: {message}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::storage_unavailable(format!("Firestore throttled {key}: {message}"))
        }
        status if status.is_server_error() => {
            AppError::storage_unavailable(format!("Firestore unavailable for {key}: {message}"))
        }
        _ => AppError::external_service(SERVICE, format!("{status} for {key}: {message}")),
    };
    error
        .with_user_id(key.user_id.clone())
        .with_details(json!({ "status": status.as_u16() }))
}

async fn failure(response: Response, key: &DocumentKey) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(document = %key, status = status.as_u16(), "Firestore request rejected");
    status_error(status, &body, key)
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>> {
        let started = Instant::now();
        let response = self
            .send(self.client.get(self.document_url(key)), key)
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(document = %key, "Firestore document does not exist");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(failure(response, key).await);
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::serialization(format!("Malformed Firestore response for {key}"))
                .with_source(e)
        })?;
        let document = match body.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields)?,
            None => Map::new(),
        };

        AppLogger::log_document_operation(
            "get",
            key.collection.as_str(),
            &key.user_id,
            true,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(Some(document))
    }

    async fn set_document(
        &self,
        key: &DocumentKey,
        document: &Document,
        merge: bool,
    ) -> AppResult<()> {
        // an empty update mask would clear the whole document
        if merge && document.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        let mut url = self.document_url(key);
        if merge {
            let mut query = url.query_pairs_mut();
            for name in document.keys() {
                query.append_pair("updateMask.fieldPaths", &field_path(name));
            }
        }

        let body = json!({ "fields": encode_fields(document) });
        let response = self.send(self.client.patch(url).json(&body), key).await?;
        if !response.status().is_success() {
            return Err(failure(response, key).await);
        }

        AppLogger::log_document_operation(
            if merge { "merge" } else { "set" },
            key.collection.as_str(),
            &key.user_id,
            true,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let probe = DocumentKey::new(Collection::Workouts, "health-check");
        let mut url = self.documents_url(&[Collection::Workouts.as_str()]);
        url.query_pairs_mut().append_pair("pageSize", "1");

        let response = self.send(self.client.get(url), &probe).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response, &probe).await)
        }
    }

    fn backend_name(&self) -> &'static str {
        SERVICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn store() -> FirestoreDocumentStore {
        let config = FirebaseConfig {
            project_id: Some("demo-project".to_owned()),
            api_key: Some("web-key".to_owned()),
            enabled: true,
            ..FirebaseConfig::default()
        };
        FirestoreDocumentStore::new(&config).unwrap()
    }

    #[test]
    fn test_document_url_layout() {
        let url = store().document_url(&DocumentKey::workouts("user 1"));
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/workouts/user%201?key=web-key"
        );
    }

    #[test]
    fn test_requires_project_id() {
        let err = FirestoreDocumentStore::new(&FirebaseConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_field_path_quoting() {
        assert_eq!(field_path("highHips"), "highHips");
        assert_eq!(field_path("3months"), "`3months`");
        assert_eq!(field_path("a.b"), "`a.b`");
    }

    #[test]
    fn test_status_mapping() {
        let key = DocumentKey::workouts("u1");
        let denied = status_error(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#,
            &key,
        );
        assert_eq!(denied.code, ErrorCode::PermissionDenied);
        assert!(denied.message.contains("insufficient permissions"));

        let unavailable = status_error(StatusCode::SERVICE_UNAVAILABLE, "", &key);
        assert_eq!(unavailable.code, ErrorCode::StorageUnavailable);

        let rejected = status_error(StatusCode::BAD_REQUEST, "not json", &key);
        assert_eq!(rejected.code, ErrorCode::ExternalServiceError);
    }
}
