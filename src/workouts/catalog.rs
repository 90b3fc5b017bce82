// ABOUTME: Built-in catalog of suggested beginner exercises
// ABOUTME: Entries can be filtered by muscle group and turned into exercise drafts for any day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::models::ExerciseDraft;
use serde::Serialize;
use std::fmt;

/// Muscle group targeted by a catalog exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum MuscleGroup {
    Arms,
    Back,
    Chest,
    Core,
    Glutes,
    Hamstrings,
    Hips,
    Obliques,
    Shoulders,
    Thighs,
}

impl MuscleGroup {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arms => "arms",
            Self::Back => "back",
            Self::Chest => "chest",
            Self::Core => "core",
            Self::Glutes => "glutes",
            Self::Hamstrings => "hamstrings",
            Self::Hips => "hips",
            Self::Obliques => "obliques",
            Self::Shoulders => "shoulders",
            Self::Thighs => "thighs",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested exercise with its recommended volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
    /// Display name
    pub name: &'static str,
    /// How to perform it
    pub description: &'static str,
    /// Muscle groups worked
    pub muscle_groups: &'static [MuscleGroup],
    /// Recommended sets
    pub sets: u32,
    /// Recommended repetitions or hold time
    pub reps: &'static str,
}

impl CatalogExercise {
    /// Form contents for adding this exercise to a day
    #[must_use]
    pub fn to_draft(&self) -> ExerciseDraft {
        ExerciseDraft::new(self.name)
            .with_sets(self.sets)
            .with_reps(self.reps)
            .with_description(self.description)
    }

    /// Whether the exercise works `group`
    #[must_use]
    pub fn targets(&self, group: MuscleGroup) -> bool {
        self.muscle_groups.contains(&group)
    }
}

const EXERCISES: &[CatalogExercise] = &[
    CatalogExercise {
        name: "Wall Push-ups",
        description: "Stand facing wall, hands on wall at shoulder height, bend elbows to bring chest to wall",
        muscle_groups: &[MuscleGroup::Chest, MuscleGroup::Arms],
        sets: 3,
        reps: "10-12",
    },
    CatalogExercise {
        name: "Incline Push-ups",
        description: "Hands on elevated surface (like a table), keep body straight as you lower chest to surface",
        muscle_groups: &[MuscleGroup::Chest, MuscleGroup::Arms],
        sets: 3,
        reps: "8-10",
    },
    CatalogExercise {
        name: "Glute Bridges",
        description: "Lie on back, knees bent, lift hips up squeezing glutes",
        muscle_groups: &[MuscleGroup::Glutes, MuscleGroup::Hamstrings],
        sets: 3,
        reps: "12-15",
    },
    CatalogExercise {
        name: "Bird Dogs",
        description: "On hands and knees, extend opposite arm and leg",
        muscle_groups: &[MuscleGroup::Core, MuscleGroup::Back],
        sets: 3,
        reps: "10 each side",
    },
    CatalogExercise {
        name: "Sumo Squats",
        description: "Wide stance squats with toes pointed slightly outward",
        muscle_groups: &[MuscleGroup::Glutes, MuscleGroup::Thighs],
        sets: 3,
        reps: "12-15",
    },
    CatalogExercise {
        name: "Fire Hydrants",
        description: "On hands and knees, lift one leg out to the side keeping knee bent",
        muscle_groups: &[MuscleGroup::Glutes, MuscleGroup::Hips],
        sets: 3,
        reps: "12 each side",
    },
    CatalogExercise {
        name: "Standing Oblique Crunches",
        description: "Stand with feet hip-width apart, bring elbow to opposite knee",
        muscle_groups: &[MuscleGroup::Obliques],
        sets: 3,
        reps: "15 each side",
    },
    CatalogExercise {
        name: "Arm Circles",
        description: "Extend arms straight out to sides, make small circles forward and backward",
        muscle_groups: &[MuscleGroup::Shoulders],
        sets: 3,
        reps: "30 seconds each direction",
    },
    CatalogExercise {
        name: "Superman Holds",
        description: "Lie on stomach, lift arms and legs off ground, hold position",
        muscle_groups: &[MuscleGroup::Back, MuscleGroup::Glutes],
        sets: 3,
        reps: "20-30 seconds",
    },
    CatalogExercise {
        name: "Side-Lying Leg Lifts",
        description: "Lie on side, top leg straight, lift up and down",
        muscle_groups: &[MuscleGroup::Hips, MuscleGroup::Thighs],
        sets: 3,
        reps: "12 each side",
    },
];

/// Every catalog exercise, in display order
#[must_use]
pub const fn catalog() -> &'static [CatalogExercise] {
    EXERCISES
}

/// Case-insensitive lookup by name
#[must_use]
pub fn find(name: &str) -> Option<&'static CatalogExercise> {
    let name = name.trim();
    EXERCISES
        .iter()
        .find(|exercise| exercise.name.eq_ignore_ascii_case(name))
}

/// Catalog exercises working `group`
pub fn for_muscle_group(group: MuscleGroup) -> impl Iterator<Item = &'static CatalogExercise> {
    EXERCISES.iter().filter(move |exercise| exercise.targets(group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Weekday, WorkoutPlan};

    #[test]
    fn test_catalog_entries_are_valid_drafts() {
        for exercise in catalog() {
            assert!(exercise.to_draft().validate().is_ok(), "{}", exercise.name);
        }
    }

    #[test]
    fn test_find_ignores_case() {
        let found = find("glute bridges").unwrap();
        assert_eq!(found.reps, "12-15");
        assert!(find("Deadlift").is_none());
    }

    #[test]
    fn test_muscle_group_filter() {
        let glutes: Vec<&str> = for_muscle_group(MuscleGroup::Glutes)
            .map(|exercise| exercise.name)
            .collect();
        assert_eq!(
            glutes,
            ["Glute Bridges", "Sumo Squats", "Fire Hydrants", "Superman Holds"]
        );
    }

    #[test]
    fn test_catalog_exercise_added_to_plan() {
        let mut plan = WorkoutPlan::new();
        let added = plan
            .add(Weekday::Friday, find("Bird Dogs").unwrap().to_draft())
            .unwrap();
        assert_eq!(added.reps, "10 each side");
        assert_eq!(added.description.as_deref(), Some("On hands and knees, extend opposite arm and leg"));
        assert_eq!(plan.day(Weekday::Friday).len(), 1);
    }
}
