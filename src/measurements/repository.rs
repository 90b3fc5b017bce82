// ABOUTME: Persistence of the per-user measurements document
// ABOUTME: Creates the document on first read and saves with top-level merge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::errors::{AppError, AppResult};
use crate::models::{MeasurementEntry, MeasurementsDocument};
use crate::storage::{to_document, DocumentKey, DocumentStore};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

/// Loads and saves one user's measurements
#[derive(Clone)]
pub struct MeasurementsRepository<S> {
    store: S,
}

impl<S: DocumentStore> MeasurementsRepository<S> {
    /// Wrap a document store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch the user's measurements, creating an empty document on first read
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for an empty user id, or the store's error when the
    /// read or the initial write fails
    pub async fn load(&self, user_id: &str) -> AppResult<MeasurementsDocument> {
        let key = measurements_key(user_id)?;

        if let Some(document) = self
            .store
            .get_document(&key)
            .await
            .map_err(|e| e.with_user_id(user_id))?
        {
            return Ok(serde_json::from_value(Value::Object(document))?);
        }

        let document = MeasurementsDocument::default();
        self.store
            .set_document(&key, &to_document(&document)?, false)
            .await
            .map_err(|e| e.with_user_id(user_id))?;
        info!(user_id, "Initialized empty measurements document");
        Ok(document)
    }

    /// Merge current values, goals and history into the stored document
    ///
    /// Other top-level fields of the stored document are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for an empty user id, or the store's error when the
    /// write fails
    pub async fn save(&self, user_id: &str, document: &MeasurementsDocument) -> AppResult<()> {
        let key = measurements_key(user_id)?;
        self.store
            .set_document(&key, &to_document(document)?, true)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to save measurements");
                e.with_user_id(user_id)
            })
    }

    /// Record the current values as a history entry dated `date` and save
    ///
    /// `document` only changes once the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no current value is entered, or the store's
    /// error when the write fails
    pub async fn record_entry(
        &self,
        user_id: &str,
        document: &mut MeasurementsDocument,
        date: NaiveDate,
    ) -> AppResult<MeasurementEntry> {
        let mut updated = document.clone();
        let entry = updated.record_entry(date)?;
        self.save(user_id, &updated).await?;

        *document = updated;
        info!(user_id, %date, "Measurement entry recorded");
        Ok(entry)
    }

    /// Delete every history entry equal to `entry` and save
    ///
    /// Returns how many entries were removed; nothing is written when none match.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the write fails; `document` is then unchanged
    pub async fn delete_entry(
        &self,
        user_id: &str,
        document: &mut MeasurementsDocument,
        entry: &MeasurementEntry,
    ) -> AppResult<usize> {
        let mut updated = document.clone();
        let removed = updated.remove_entry(entry);
        if removed == 0 {
            return Ok(0);
        }

        self.save(user_id, &updated).await?;
        *document = updated;
        info!(user_id, date = %entry.date, removed, "Measurement entry deleted");
        Ok(removed)
    }
}

fn measurements_key(user_id: &str) -> AppResult<DocumentKey> {
    if user_id.trim().is_empty() {
        return Err(AppError::auth_required());
    }
    Ok(DocumentKey::measurements(user_id))
}
