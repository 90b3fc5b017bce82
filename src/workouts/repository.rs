// ABOUTME: Persistence bridge between the weekly workout plan and the document store
// ABOUTME: Loads with create-on-first-read and saves the whole plan as one overwrite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::errors::{AppError, AppResult};
use crate::models::WorkoutPlan;
use crate::storage::{to_document, DocumentKey, DocumentStore};
use tracing::{info, instrument, warn};

/// Loads and saves one user's workout plan
///
/// Neither operation retries; failures are returned to the caller, which decides
/// whether to let the user try again.
#[derive(Clone)]
pub struct WorkoutRepository<S> {
    store: S,
}

impl<S: DocumentStore> WorkoutRepository<S> {
    /// Wrap a document store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying document store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the user's plan, creating and storing an empty one on first read
    ///
    /// Stored days that are missing or malformed load as empty lists.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for an empty user id, or the store's error when the
    /// read or the initial write fails
    #[instrument(skip(self), fields(document = "workouts"))]
    pub async fn load(&self, user_id: &str) -> AppResult<WorkoutPlan> {
        let key = workouts_key(user_id)?;

        if let Some(document) = self
            .store
            .get_document(&key)
            .await
            .map_err(|e| e.with_user_id(user_id))?
        {
            return Ok(WorkoutPlan::from_document(&document));
        }

        let plan = WorkoutPlan::new();
        self.store
            .set_document(&key, &to_document(&plan)?, false)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to initialize workout plan");
                e.with_user_id(user_id)
            })?;
        info!(user_id, "Initialized empty workout plan");
        Ok(plan)
    }

    /// Overwrite the stored plan with `plan`, all seven days included
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for an empty user id, or the store's error when the
    /// write fails
    #[instrument(skip(self, plan), fields(exercises = plan.exercise_count()))]
    pub async fn save(&self, user_id: &str, plan: &WorkoutPlan) -> AppResult<()> {
        let key = workouts_key(user_id)?;
        let document = to_document(plan)?;

        self.store
            .set_document(&key, &document, false)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to save workout plan");
                e.with_user_id(user_id)
            })?;
        info!(user_id, "Workout plan saved");
        Ok(())
    }
}

fn workouts_key(user_id: &str) -> AppResult<DocumentKey> {
    if user_id.trim().is_empty() {
        return Err(AppError::auth_required());
    }
    Ok(DocumentKey::workouts(user_id))
}
