// ABOUTME: Integration tests for workout plan persistence and the plan editor
// ABOUTME: First-read creation, whole-plan save, malformed documents, and remote failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use bodyplan::errors::{ErrorCategory, ErrorCode};
use bodyplan::models::{ExerciseId, ExercisePatch, TimeUnit, Weekday};
use bodyplan::storage::{DocumentKey, DocumentStore};
use bodyplan::test_utils::{plank_draft, push_up_draft, squat_draft, FailingDocumentStore};
use bodyplan::workouts::{catalog, PlanEditor, WorkoutRepository};
use serde_json::{json, Value};

#[tokio::test]
async fn test_first_load_creates_empty_week() {
    let (store, repository) = common::workout_setup();

    let plan = repository.load("uid-new").await.unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.days().count(), 7);

    let stored = store
        .get_document(&DocumentKey::workouts("uid-new"))
        .await
        .unwrap()
        .expect("document created on first read");
    assert_eq!(stored.len(), 7);
    for day in Weekday::ALL {
        assert_eq!(stored[day.key()], json!([]), "{day}");
    }
}

#[tokio::test]
async fn test_saved_plan_round_trips_in_order() {
    let (_, repository) = common::workout_setup();
    let mut plan = repository.load("uid-1").await.unwrap();
    let squat = plan.add(Weekday::Monday, squat_draft()).unwrap();
    plan.add(Weekday::Monday, plank_draft()).unwrap();
    plan.add(Weekday::Friday, push_up_draft()).unwrap();
    assert!(plan.reorder(Weekday::Monday, 0, 1));

    repository.save("uid-1", &plan).await.unwrap();
    let loaded = repository.load("uid-1").await.unwrap();

    assert_eq!(loaded, plan);
    let monday: Vec<&str> = loaded
        .day(Weekday::Monday)
        .iter()
        .map(|exercise| exercise.name.as_str())
        .collect();
    assert_eq!(monday, ["Plank", "Bodyweight Squats"]);
    assert_eq!(loaded.day(Weekday::Monday)[1].id, squat.id);
}

#[tokio::test]
async fn test_legacy_document_is_coerced() {
    let (store, repository) = common::workout_setup();
    let key = DocumentKey::workouts("uid-legacy");
    let Value::Object(document) = json!({
        "monday": [
            { "id": 1_700_000_000_000_u64, "name": "Lunges", "sets": 3, "reps": "10", "time": "", "videoUrl": "" },
            { "id": 1_700_000_000_000_u64, "name": "Lunges again", "sets": 2, "reps": "8" }
        ],
        "tuesday": "not a list"
    }) else {
        unreachable!()
    };
    store.set_document(&key, &document, false).await.unwrap();

    let plan = repository.load("uid-legacy").await.unwrap();
    let monday = plan.day(Weekday::Monday);
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[0].id, ExerciseId::from("1700000000000"));
    assert_ne!(monday[0].id, monday[1].id);
    assert_eq!(monday[0].time, None);
    assert!(plan.day(Weekday::Tuesday).is_empty());
}

#[tokio::test]
async fn test_loosely_typed_exercises_survive_save() {
    let (store, repository) = common::workout_setup();
    let key = DocumentKey::workouts("uid-loose");
    let Value::Object(document) = json!({
        "monday": [
            { "id": 1, "name": "Squats", "sets": null, "reps": "12", "timeUnit": "seconds" },
            { "id": 2, "name": "Plank", "sets": 3, "reps": "", "time": 30, "timeUnit": null },
            { "id": 3, "name": "Lunges", "sets": -1, "reps": "10", "timeUnit": "seconds" },
            { "name": "Calf Raises", "sets": 2, "reps": "15" }
        ]
    }) else {
        unreachable!()
    };
    store.set_document(&key, &document, false).await.unwrap();

    let plan = repository.load("uid-loose").await.unwrap();
    let monday = plan.day(Weekday::Monday);
    assert_eq!(monday.len(), 4);
    assert_eq!(monday[0].sets, 3);
    assert_eq!(monday[1].time_unit, TimeUnit::Seconds);
    assert_eq!(monday[1].time, Some(30.0));
    assert_eq!(monday[2].sets, 3);
    assert!(!monday[3].id.as_str().is_empty());

    repository.save("uid-loose", &plan).await.unwrap();
    let stored = store.get_document(&key).await.unwrap().unwrap();
    let names: Vec<&str> = stored["monday"]
        .as_array()
        .unwrap()
        .iter()
        .map(|exercise| exercise["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Squats", "Plank", "Lunges", "Calf Raises"]);
    assert_eq!(stored["monday"][0]["sets"], json!(3));
    assert_eq!(stored["monday"][1]["timeUnit"], json!("seconds"));
    assert_eq!(repository.load("uid-loose").await.unwrap(), plan);
}

#[tokio::test]
async fn test_editor_saves_only_on_request() {
    let (store, repository) = common::workout_setup();
    let mut editor = PlanEditor::open(repository, "uid-2").await.unwrap();
    assert!(!editor.has_unsaved_changes());

    let added = editor.add(Weekday::Wednesday, squat_draft()).unwrap();
    assert!(editor.has_unsaved_changes());
    let stored = store
        .get_document(&DocumentKey::workouts("uid-2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["wednesday"], json!([]));

    assert!(editor
        .update(Weekday::Wednesday, &added.id, ExercisePatch::sets(5))
        .unwrap());
    editor.save().await.unwrap();
    assert!(!editor.has_unsaved_changes());

    let stored = store
        .get_document(&DocumentKey::workouts("uid-2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["wednesday"][0]["sets"], json!(5));
}

#[tokio::test]
async fn test_editor_stale_ids_are_silent_noops() {
    let (_, repository) = common::workout_setup();
    let mut editor = PlanEditor::open(repository, "uid-3").await.unwrap();
    let missing = ExerciseId::generate();

    assert!(!editor.remove(Weekday::Sunday, &missing));
    assert!(!editor
        .update(Weekday::Sunday, &missing, ExercisePatch::sets(2))
        .unwrap());
    assert!(!editor.reorder(Weekday::Sunday, 0, 3));
    assert!(!editor.has_unsaved_changes());
}

#[tokio::test]
async fn test_editor_reload_discards_edits() {
    let (_, repository) = common::workout_setup();
    let mut editor = PlanEditor::open(repository, "uid-4").await.unwrap();
    editor.add(Weekday::Monday, plank_draft()).unwrap();
    editor.reload().await.unwrap();

    assert!(editor.plan().is_empty());
    assert!(!editor.has_unsaved_changes());
}

#[tokio::test]
async fn test_catalog_exercise_added_to_plan() {
    let (_, repository) = common::workout_setup();
    let mut editor = PlanEditor::open(repository, "uid-5").await.unwrap();
    let suggestion = catalog::find("glute bridges").expect("catalog entry");

    let exercise = editor.add(Weekday::Thursday, suggestion.to_draft()).unwrap();
    assert_eq!(exercise.name, suggestion.name);
    assert_eq!(exercise.sets, suggestion.sets);
}

#[tokio::test]
async fn test_remote_failure_keeps_edits() {
    let (_, repository) = common::workout_setup();
    let mut editor = PlanEditor::open(repository, "uid-6").await.unwrap();
    editor.add(Weekday::Monday, squat_draft()).unwrap();

    let failing = WorkoutRepository::new(FailingDocumentStore::unavailable());
    let err = failing.save("uid-6", editor.plan()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    assert_eq!(err.category(), ErrorCategory::Remote);
    assert_eq!(err.context.user_id.as_deref(), Some("uid-6"));
    assert!(editor.has_unsaved_changes());
}

#[tokio::test]
async fn test_load_requires_user() {
    let (_, repository) = common::workout_setup();
    let err = repository.load("").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);

    let store = FailingDocumentStore::denied();
    let err = WorkoutRepository::new(store.clone())
        .load("uid-7")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert_eq!(store.calls(), 1);
}
