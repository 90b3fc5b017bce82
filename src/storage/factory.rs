// ABOUTME: Document store factory selecting the backend from configuration
// ABOUTME: Delegates every DocumentStore call to the in-memory or Firestore implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#[cfg(feature = "firebase")]
use super::firestore::FirestoreDocumentStore;
use super::{memory::InMemoryDocumentStore, Document, DocumentKey, DocumentStore};
use crate::config::{AppConfig, StorageBackend};
#[cfg(not(feature = "firebase"))]
use crate::errors::AppError;
use crate::errors::AppResult;
use tracing::info;

/// Document store instance wrapper that delegates to the selected backend
#[derive(Clone)]
pub enum Store {
    /// Process-local documents
    Memory(InMemoryDocumentStore),
    /// Cloud Firestore
    #[cfg(feature = "firebase")]
    Firestore(FirestoreDocumentStore),
}

impl Store {
    /// Build the backend named by `config.storage_backend`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if Firestore is selected without credentials
    /// or without the `firebase` feature
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let store = match config.storage_backend {
            StorageBackend::Memory => Self::Memory(InMemoryDocumentStore::new()),
            #[cfg(feature = "firebase")]
            StorageBackend::Firestore => {
                Self::Firestore(FirestoreDocumentStore::new(&config.firebase)?)
            }
            #[cfg(not(feature = "firebase"))]
            StorageBackend::Firestore => {
                return Err(AppError::config(
                    "Firestore storage requires the `firebase` feature",
                ))
            }
        };

        info!(backend = store.backend_name(), "Document store initialized");
        Ok(store)
    }

    /// Process-local store, as used by tests
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(InMemoryDocumentStore::new())
    }

    /// Forward the signed-in user's id token to backends that need it
    pub async fn set_id_token(&self, id_token: Option<String>) {
        match self {
            Self::Memory(_) => {}
            #[cfg(feature = "firebase")]
            Self::Firestore(store) => store.set_id_token(id_token).await,
        }
        #[cfg(not(feature = "firebase"))]
        drop(id_token);
    }

    /// Human-readable backend description
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Memory(_) => "In-memory document store (local development and tests)",
            #[cfg(feature = "firebase")]
            Self::Firestore(_) => "Cloud Firestore over REST",
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for Store {
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>> {
        match self {
            Self::Memory(store) => store.get_document(key).await,
            #[cfg(feature = "firebase")]
            Self::Firestore(store) => store.get_document(key).await,
        }
    }

    async fn set_document(
        &self,
        key: &DocumentKey,
        document: &Document,
        merge: bool,
    ) -> AppResult<()> {
        match self {
            Self::Memory(store) => store.set_document(key, document, merge).await,
            #[cfg(feature = "firebase")]
            Self::Firestore(store) => store.set_document(key, document, merge).await,
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Memory(store) => store.health_check().await,
            #[cfg(feature = "firebase")]
            Self::Firestore(store) => store.health_check().await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(store) => store.backend_name(),
            #[cfg(feature = "firebase")]
            Self::Firestore(store) => store.backend_name(),
        }
    }
}
