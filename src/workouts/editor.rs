// ABOUTME: Editing session for one user's weekly plan with explicit save
// ABOUTME: Tracks unsaved changes; list edits never touch the store until save is called
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::repository::WorkoutRepository;
use crate::errors::AppResult;
use crate::models::{Exercise, ExerciseDraft, ExerciseId, ExercisePatch, Weekday, WorkoutPlan};
use crate::storage::DocumentStore;

/// A loaded plan plus the repository it came from
///
/// Edits change the in-memory plan only and mark the session dirty; the stored
/// document is written when [`PlanEditor::save`] is called.
pub struct PlanEditor<S> {
    repository: WorkoutRepository<S>,
    user_id: String,
    plan: WorkoutPlan,
    dirty: bool,
}

impl<S: DocumentStore> PlanEditor<S> {
    /// Load the user's plan (creating it on first use) and start editing
    ///
    /// # Errors
    ///
    /// Returns the repository error when the plan cannot be loaded
    pub async fn open(repository: WorkoutRepository<S>, user_id: impl Into<String>) -> AppResult<Self> {
        let user_id = user_id.into();
        let plan = repository.load(&user_id).await?;
        Ok(Self {
            repository,
            user_id,
            plan,
            dirty: false,
        })
    }

    /// Current in-memory plan
    pub const fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    /// Owner of the plan
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether edits were made since the last load or save
    pub const fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Add an exercise to the end of `day`
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid draft
    pub fn add(&mut self, day: Weekday, draft: ExerciseDraft) -> AppResult<Exercise> {
        let exercise = self.plan.add(day, draft)?;
        self.dirty = true;
        Ok(exercise)
    }

    /// Update an exercise in place; `false` when it no longer exists
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid patch
    pub fn update(&mut self, day: Weekday, id: &ExerciseId, patch: ExercisePatch) -> AppResult<bool> {
        let applied = self.plan.update(day, id, patch)?;
        self.dirty |= applied;
        Ok(applied)
    }

    /// Remove an exercise; `false` when it no longer exists
    pub fn remove(&mut self, day: Weekday, id: &ExerciseId) -> bool {
        let removed = self.plan.remove(day, id);
        self.dirty |= removed;
        removed
    }

    /// Move an exercise within `day`; `false` when nothing moved
    pub fn reorder(&mut self, day: Weekday, from: usize, to: usize) -> bool {
        let moved = self.plan.reorder(day, from, to);
        self.dirty |= moved;
        moved
    }

    /// Write the whole plan to the store
    ///
    /// On failure the edits stay in memory and the session stays dirty, so the
    /// user can try again.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the write fails
    pub async fn save(&mut self) -> AppResult<()> {
        self.repository.save(&self.user_id, &self.plan).await?;
        self.dirty = false;
        Ok(())
    }

    /// Discard unsaved edits by reloading the stored plan
    ///
    /// # Errors
    ///
    /// Returns the store's error when the read fails
    pub async fn reload(&mut self) -> AppResult<()> {
        self.plan = self.repository.load(&self.user_id).await?;
        self.dirty = false;
        Ok(())
    }
}
