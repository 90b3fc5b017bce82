// ABOUTME: Weekly workout plan keyed by the seven weekdays
// ABOUTME: Pure in-memory add, update, remove, and reorder operations on one day's exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::exercise::{Exercise, ExerciseDraft, ExerciseId, ExercisePatch};
use crate::errors::{AppError, AppResult};

/// Day-of-week bucket of a workout plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Document key for this day
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Weekday {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.key() == normalized)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown weekday: {s}")))
    }
}

/// Seven ordered exercise lists, one per weekday
///
/// Position within a day is the user-chosen order; there is no separate order field.
/// All seven days always exist, possibly empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPlan {
    days: [Vec<Exercise>; 7],
}

impl WorkoutPlan {
    /// Plan with seven empty days
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exercises planned for `day`, in order
    #[must_use]
    pub fn day(&self, day: Weekday) -> &[Exercise] {
        &self.days[day.index()]
    }

    /// Every day with its exercises, Monday first
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[Exercise])> {
        Weekday::ALL
            .into_iter()
            .map(move |day| (day, self.day(day)))
    }

    /// Total number of exercises across the week
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// Whether no day has any exercise
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercise_count() == 0
    }

    /// Look up an exercise by id within `day`
    #[must_use]
    pub fn find(&self, day: Weekday, id: &ExerciseId) -> Option<&Exercise> {
        self.day(day).iter().find(|exercise| &exercise.id == id)
    }

    /// Validate `draft`, assign a fresh id, and append it to `day`
    ///
    /// # Errors
    ///
    /// Returns a validation error when the draft breaks a form constraint; the plan
    /// is left unchanged
    pub fn add(&mut self, day: Weekday, draft: ExerciseDraft) -> AppResult<Exercise> {
        draft.validate()?;

        let bucket = &mut self.days[day.index()];
        let mut id = ExerciseId::generate();
        while bucket.iter().any(|existing| existing.id == id) {
            id = ExerciseId::generate();
        }

        let exercise = draft.into_exercise(id);
        debug!(%day, exercise_id = %exercise.id, "Exercise added");
        bucket.push(exercise.clone());
        Ok(exercise)
    }

    /// Apply `patch` to the exercise `id` in `day`, keeping its position
    ///
    /// Returns `Ok(false)` without changes when no such exercise exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the patch breaks a form constraint
    pub fn update(&mut self, day: Weekday, id: &ExerciseId, patch: ExercisePatch) -> AppResult<bool> {
        patch.validate()?;

        let Some(exercise) = self.days[day.index()]
            .iter_mut()
            .find(|exercise| &exercise.id == id)
        else {
            debug!(%day, exercise_id = %id, "Update skipped, exercise no longer exists");
            return Ok(false);
        };

        patch.apply_to(exercise);
        Ok(true)
    }

    /// Remove the exercise `id` from `day`; returns whether anything was removed
    pub fn remove(&mut self, day: Weekday, id: &ExerciseId) -> bool {
        let bucket = &mut self.days[day.index()];
        let before = bucket.len();
        bucket.retain(|exercise| &exercise.id != id);

        let removed = bucket.len() != before;
        if !removed {
            debug!(%day, exercise_id = %id, "Remove skipped, exercise no longer exists");
        }
        removed
    }

    /// Move the exercise at `from` so that it ends up at index `to` within `day`
    ///
    /// Returns `false` without changes when the indices are equal or out of range.
    pub fn reorder(&mut self, day: Weekday, from: usize, to: usize) -> bool {
        let bucket = &mut self.days[day.index()];
        if from == to || from >= bucket.len() || to >= bucket.len() {
            return false;
        }

        let moved = bucket.remove(from);
        bucket.insert(to, moved);
        true
    }

    /// Build a plan from a stored document, coercing malformed days
    ///
    /// Missing or non-array days become empty. Exercises keep whatever fields are
    /// readable and fall back to defaults for the rest; only items without a name are
    /// dropped. Missing and duplicate ids are reassigned so ids stay unique per day.
    #[must_use]
    pub fn from_document(document: &Map<String, Value>) -> Self {
        let mut plan = Self::new();
        for day in Weekday::ALL {
            plan.days[day.index()] = coerce_day(day, document.get(day.key()));
        }
        plan
    }
}

fn coerce_day(day: Weekday, value: Option<&Value>) -> Vec<Exercise> {
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Vec::new(),
        Some(other) => {
            warn!(%day, found = %other, "Plan day is not a list, treating as empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut exercises = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Exercise>(item.clone()) {
            Ok(exercise) if exercise.name.trim().is_empty() => {
                warn!(%day, exercise_id = %exercise.id, "Dropping exercise without a name");
            }
            Ok(mut exercise) => {
                if !seen.insert(exercise.id.clone()) {
                    let fresh = ExerciseId::generate();
                    warn!(%day, duplicate = %exercise.id, reassigned = %fresh, "Duplicate exercise id");
                    exercise.id = fresh.clone();
                    seen.insert(fresh);
                }
                exercises.push(exercise);
            }
            Err(e) => warn!(%day, error = %e, "Dropping unreadable exercise"),
        }
    }
    exercises
}

impl Serialize for WorkoutPlan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Weekday::ALL.len()))?;
        for (day, exercises) in self.days() {
            map.serialize_entry(day.key(), exercises)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorkoutPlan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_document(&document))
    }
}
