// ABOUTME: Document store abstraction keyed by collection and user id
// ABOUTME: Pluggable backends (in-memory, Firestore) behind one async trait and a factory enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Document store
//!
//! Each user owns one document per collection. Callers read a whole document,
//! edit it in memory and write it back, either replacing the stored copy or
//! merging top-level fields into it.

/// Backend selection from configuration
pub mod factory;
/// Firestore REST backend
#[cfg(feature = "firebase")]
pub mod firestore;
/// Process-local backend
pub mod memory;

use crate::constants::documents::{MEASUREMENTS_COLLECTION, WORKOUTS_COLLECTION};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

pub use factory::Store;
pub use memory::InMemoryDocumentStore;

/// A stored document: a JSON object with arbitrary top-level fields
pub type Document = Map<String, Value>;

/// Serialize a model into a document; the model must serialize as a JSON object
///
/// # Errors
///
/// Returns a serialization error if the model fails to serialize or is not an object
pub fn to_document<T: Serialize + ?Sized>(model: &T) -> AppResult<Document> {
    match serde_json::to_value(model)? {
        Value::Object(document) => Ok(document),
        other => Err(AppError::serialization(format!(
            "expected a JSON object document, got {other}"
        ))),
    }
}

/// Collections the application writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Weekly workout plans
    Workouts,
    /// Body measurements (current, goals, history)
    Measurements,
}

impl Collection {
    /// Collection name in the remote store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workouts => WORKOUTS_COLLECTION,
            Self::Measurements => MEASUREMENTS_COLLECTION,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one user's document within a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    /// Collection holding the document
    pub collection: Collection,
    /// Owning user; also the document id
    pub user_id: String,
}

impl DocumentKey {
    /// Key for an arbitrary collection
    pub fn new(collection: Collection, user_id: impl Into<String>) -> Self {
        Self {
            collection,
            user_id: user_id.into(),
        }
    }

    /// Key of the user's workout plan
    pub fn workouts(user_id: impl Into<String>) -> Self {
        Self::new(Collection::Workouts, user_id)
    }

    /// Key of the user's measurements document
    pub fn measurements(user_id: impl Into<String>) -> Self {
        Self::new(Collection::Measurements, user_id)
    }
}

/// Renders the relative document path, `collection/user_id`
impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.user_id)
    }
}

/// Document store trait for pluggable backend implementations
///
/// Failures surface as `StorageUnavailable` or `PermissionDenied` errors; no
/// implementation retries on its own.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or refuses access
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>>;

    /// Write a document
    ///
    /// With `merge == false` the stored document is replaced. With `merge == true`
    /// the given top-level fields overwrite their stored counterparts and all other
    /// stored fields are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or refuses access
    async fn set_document(&self, key: &DocumentKey, document: &Document, merge: bool)
        -> AppResult<()>;

    /// Verify the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unhealthy
    async fn health_check(&self) -> AppResult<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

#[async_trait::async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>> {
        (**self).get_document(key).await
    }

    async fn set_document(
        &self,
        key: &DocumentKey,
        document: &Document,
        merge: bool,
    ) -> AppResult<()> {
        (**self).set_document(key, document, merge).await
    }

    async fn health_check(&self) -> AppResult<()> {
        (**self).health_check().await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_paths() {
        assert_eq!(DocumentKey::workouts("u1").to_string(), "workouts/u1");
        assert_eq!(DocumentKey::measurements("u1").to_string(), "users/u1");
    }
}
