// ABOUTME: Exercise record model with creation drafts and partial-update patches
// ABOUTME: Validates form constraints and renders the card summary line
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::lenient;
use crate::constants::exercise::{DEFAULT_REPS, DEFAULT_SETS};
use crate::errors::{AppError, AppResult};

/// Opaque exercise identifier, unique within a day and never reused
///
/// New identifiers are random UUIDs. Plans saved by earlier clients used numeric
/// creation timestamps; those load as their decimal text. Null or blank ids load as a
/// fresh identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ExerciseId(String);

impl ExerciseId {
    /// Allocate a fresh identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExerciseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ExerciseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ExerciseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) if !text.trim().is_empty() => Self(text),
            Value::Number(number) => Self(number.to_string()),
            _ => Self::generate(),
        })
    }
}

/// Unit of an exercise's timed component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds
    #[default]
    Seconds,
    /// Minutes
    Minutes,
}

impl TimeUnit {
    /// Lowercase name as stored and displayed
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned exercise within a day
///
/// `reps` and `time` are independent; an exercise may carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Stable identifier
    #[serde(default = "ExerciseId::generate")]
    pub id: ExerciseId,
    /// Display name, never empty
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Number of sets, at least one
    #[serde(default = "default_sets", deserialize_with = "lenient::count")]
    pub sets: u32,
    /// Repetition target; free-form ("10-12", "to failure")
    #[serde(default = "default_reps", deserialize_with = "lenient::text")]
    pub reps: String,
    /// Optional timed component, positive
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<f64>,
    /// Unit of `time`
    #[serde(default, deserialize_with = "lenient::time_unit")]
    pub time_unit: TimeUnit,
    /// Optional demonstration video link
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub video_url: Option<String>,
    /// Optional free-text instructions
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

const fn default_sets() -> u32 {
    DEFAULT_SETS
}

fn default_reps() -> String {
    DEFAULT_REPS.to_owned()
}

impl Exercise {
    /// Detail line shown on the exercise card, e.g. `3 sets × 10-12 reps × 30 seconds`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} sets", self.sets)];
        if !self.reps.trim().is_empty() {
            parts.push(format!("{} reps", self.reps));
        }
        if let Some(time) = self.time {
            parts.push(format!("{time} {}", self.time_unit));
        }
        parts.join(" × ")
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::missing_field("Exercise name"));
    }
    Ok(())
}

fn validate_sets(sets: u32) -> AppResult<()> {
    if sets == 0 {
        return Err(AppError::value_out_of_range(
            "Sets must be a positive whole number",
        ));
    }
    Ok(())
}

fn validate_time(time: Option<f64>) -> AppResult<()> {
    match time {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(AppError::value_out_of_range(
            format!("Time must be a positive number, got {value}"),
        )),
        _ => Ok(()),
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|value| !value.trim().is_empty())
}

/// Exercise form contents before an identifier is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    /// Display name (required)
    pub name: String,
    /// Number of sets
    pub sets: u32,
    /// Repetition target
    pub reps: String,
    /// Optional timed component
    pub time: Option<f64>,
    /// Unit of `time`
    pub time_unit: TimeUnit,
    /// Optional demonstration video link
    pub video_url: Option<String>,
    /// Optional instructions
    pub description: Option<String>,
}

impl Default for ExerciseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS.to_owned(),
            time: None,
            time_unit: TimeUnit::Seconds,
            video_url: None,
            description: None,
        }
    }
}

impl ExerciseDraft {
    /// Draft with form defaults and the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the number of sets
    #[must_use]
    pub const fn with_sets(mut self, sets: u32) -> Self {
        self.sets = sets;
        self
    }

    /// Set the repetition target
    #[must_use]
    pub fn with_reps(mut self, reps: impl Into<String>) -> Self {
        self.reps = reps.into();
        self
    }

    /// Set the timed component
    #[must_use]
    pub const fn with_time(mut self, time: f64, unit: TimeUnit) -> Self {
        self.time = Some(time);
        self.time_unit = unit;
        self
    }

    /// Set the demonstration video link
    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Set the instructions
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check form constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank, sets is zero, or time
    /// is present but not a positive number
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_sets(self.sets)?;
        validate_time(self.time)
    }

    /// Finalize into a record carrying `id`; callers validate first
    pub(crate) fn into_exercise(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name.trim().to_owned(),
            sets: self.sets,
            reps: self.reps,
            time: self.time,
            time_unit: self.time_unit,
            video_url: non_blank(self.video_url),
            description: non_blank(self.description),
        }
    }
}

/// Partial update of an exercise; `None` leaves a field unchanged
///
/// Optional fields take `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    /// New display name
    pub name: Option<String>,
    /// New number of sets
    pub sets: Option<u32>,
    /// New repetition target
    pub reps: Option<String>,
    /// New timed component or `Some(None)` to clear it
    pub time: Option<Option<f64>>,
    /// New unit of `time`
    pub time_unit: Option<TimeUnit>,
    /// New video link or `Some(None)` to clear it
    pub video_url: Option<Option<String>>,
    /// New instructions or `Some(None)` to clear them
    pub description: Option<Option<String>>,
}

impl ExercisePatch {
    /// Patch changing only the number of sets
    #[must_use]
    pub fn sets(sets: u32) -> Self {
        Self {
            sets: Some(sets),
            ..Self::default()
        }
    }

    /// Patch replacing every editable field with the draft's values
    #[must_use]
    pub fn from_draft(draft: ExerciseDraft) -> Self {
        Self {
            name: Some(draft.name),
            sets: Some(draft.sets),
            reps: Some(draft.reps),
            time: Some(draft.time),
            time_unit: Some(draft.time_unit),
            video_url: Some(draft.video_url),
            description: Some(draft.description),
        }
    }

    /// Whether applying this patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the constraints of every field the patch sets
    ///
    /// # Errors
    ///
    /// Returns a validation error under the same rules as [`ExerciseDraft::validate`]
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(sets) = self.sets {
            validate_sets(sets)?;
        }
        if let Some(time) = self.time {
            validate_time(time)?;
        }
        Ok(())
    }

    /// Apply in place; callers validate first
    pub(crate) fn apply_to(self, exercise: &mut Exercise) {
        if let Some(name) = self.name {
            exercise.name = name.trim().to_owned();
        }
        if let Some(sets) = self.sets {
            exercise.sets = sets;
        }
        if let Some(reps) = self.reps {
            exercise.reps = reps;
        }
        if let Some(time) = self.time {
            exercise.time = time;
        }
        if let Some(unit) = self.time_unit {
            exercise.time_unit = unit;
        }
        if let Some(url) = self.video_url {
            exercise.video_url = non_blank(url);
        }
        if let Some(description) = self.description {
            exercise.description = non_blank(description);
        }
    }
}
