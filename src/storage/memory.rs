// ABOUTME: In-memory document store for local development and tests
// ABOUTME: Keeps documents in a shared map with shallow top-level merge semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::{Document, DocumentKey, DocumentStore};
use crate::errors::AppResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory document store
///
/// Clones share the same underlying map, so a test can keep a handle and inspect
/// what a repository wrote.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentKey, Document>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether no document has been written
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Drop every stored document
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn set_document(
        &self,
        key: &DocumentKey,
        document: &Document,
        merge: bool,
    ) -> AppResult<()> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(key) {
            Some(existing) if merge => {
                for (field, value) in document {
                    existing.insert(field.clone(), value.clone());
                }
            }
            _ => {
                documents.insert(key.clone(), document.clone());
            }
        }
        drop(documents);

        debug!(document = %key, merge, "Stored document in memory");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let store = InMemoryDocumentStore::new();
        let found = store.get_document(&DocumentKey::workouts("nobody")).await;
        assert!(matches!(found, Ok(None)));
    }

    #[tokio::test]
    async fn test_merge_keeps_untouched_fields() {
        let store = InMemoryDocumentStore::new();
        let key = DocumentKey::measurements("u1");
        store
            .set_document(&key, &document(json!({"current": {"hips": 90}, "goals": {}})), false)
            .await
            .unwrap();
        store
            .set_document(&key, &document(json!({"goals": {"hips": 85}})), true)
            .await
            .unwrap();

        let stored = store.get_document(&key).await.unwrap().unwrap();
        assert_eq!(
            serde_json::Value::Object(stored),
            json!({"current": {"hips": 90}, "goals": {"hips": 85}})
        );
    }

    #[tokio::test]
    async fn test_overwrite_replaces_document() {
        let store = InMemoryDocumentStore::new();
        let key = DocumentKey::workouts("u1");
        store
            .set_document(&key, &document(json!({"monday": [], "extra": 1})), false)
            .await
            .unwrap();
        store
            .set_document(&key, &document(json!({"monday": []})), false)
            .await
            .unwrap();

        let stored = store.get_document(&key).await.unwrap().unwrap();
        assert!(!stored.contains_key("extra"));
        assert_eq!(store.len().await, 1);
    }
}
