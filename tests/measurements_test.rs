// ABOUTME: Integration tests for measurement persistence, history, and chart series
// ABOUTME: Checks first-read creation, merge saves, entry record and delete, and range filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use bodyplan::errors::ErrorCode;
use bodyplan::measurements::{chart_series, MeasurementsRepository, DEFAULT_CHART_FIELDS};
use bodyplan::models::{MeasurementField, MeasurementsDocument, TimeRange};
use bodyplan::storage::{DocumentKey, DocumentStore};
use bodyplan::test_utils::FailingDocumentStore;
use serde_json::{json, Value};

#[tokio::test]
async fn test_first_load_creates_empty_document() {
    let (store, repository) = common::measurements_setup();

    let document = repository.load("uid-1").await.unwrap();
    assert_eq!(document, MeasurementsDocument::default());

    let stored = store
        .get_document(&DocumentKey::measurements("uid-1"))
        .await
        .unwrap()
        .expect("document created on first read");
    assert_eq!(stored["history"], json!([]));
    assert_eq!(stored["current"]["waist"], json!(""));
    assert_eq!(stored["goals"]["highHips"], json!(""));
}

#[tokio::test]
async fn test_save_merges_with_foreign_fields() {
    let (store, repository) = common::measurements_setup();
    let key = DocumentKey::measurements("uid-2");
    let Value::Object(profile) = json!({ "displayName": "Ada", "history": [] }) else {
        unreachable!()
    };
    store.set_document(&key, &profile, false).await.unwrap();

    let mut document = repository.load("uid-2").await.unwrap();
    document.current.set(MeasurementField::Waist, Some(72.5));
    repository.save("uid-2", &document).await.unwrap();

    let stored = store.get_document(&key).await.unwrap().unwrap();
    assert_eq!(stored["displayName"], json!("Ada"));
    assert_eq!(stored["current"]["waist"], json!(72.5));
}

#[tokio::test]
async fn test_record_and_delete_entries() {
    let (_, repository) = common::measurements_setup();
    let mut document = repository.load("uid-3").await.unwrap();

    let err = repository
        .record_entry("uid-3", &mut document, common::date("2024-05-01"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(document.history.is_empty());

    document.current.set(MeasurementField::Hips, Some(101.0));
    let first = repository
        .record_entry("uid-3", &mut document, common::date("2024-05-01"))
        .await
        .unwrap();
    document.current.set(MeasurementField::Hips, Some(99.0));
    repository
        .record_entry("uid-3", &mut document, common::date("2024-06-01"))
        .await
        .unwrap();

    let reloaded = repository.load("uid-3").await.unwrap();
    assert_eq!(reloaded.history.len(), 2);
    assert_eq!(reloaded.history[0], first);

    assert_eq!(
        repository
            .delete_entry("uid-3", &mut document, &first)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        repository
            .delete_entry("uid-3", &mut document, &first)
            .await
            .unwrap(),
        0
    );
    let reloaded = repository.load("uid-3").await.unwrap();
    assert_eq!(reloaded.history.len(), 1);
    assert_eq!(
        reloaded.history[0].values.get(MeasurementField::Hips),
        Some(99.0)
    );
}

#[tokio::test]
async fn test_unreadable_history_kept_across_saves() {
    let (store, repository) = common::measurements_setup();
    let key = DocumentKey::measurements("uid-6");
    let Value::Object(document) = json!({
        "current": { "waist": 80 },
        "goals": {},
        "history": [
            { "date": "2024-01-01", "waist": 82 },
            { "date": "01/02/2024", "waist": 81 }
        ]
    }) else {
        unreachable!()
    };
    store.set_document(&key, &document, false).await.unwrap();

    let mut document = repository.load("uid-6").await.unwrap();
    assert_eq!(document.history.len(), 1);
    repository
        .record_entry("uid-6", &mut document, common::date("2024-03-01"))
        .await
        .unwrap();

    let stored = store.get_document(&key).await.unwrap().unwrap();
    let history = stored["history"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.contains(&json!({ "date": "01/02/2024", "waist": 81 })));

    let reloaded = repository.load("uid-6").await.unwrap();
    assert_eq!(reloaded.history.len(), 2);
    assert_eq!(reloaded.unreadable_history.len(), 1);
}

#[tokio::test]
async fn test_failed_save_leaves_document_untouched() {
    let repository = MeasurementsRepository::new(FailingDocumentStore::unavailable());
    let mut document = MeasurementsDocument::default();
    document.current.set(MeasurementField::Bust, Some(90.0));

    let err = repository
        .record_entry("uid-4", &mut document, common::date("2024-01-01"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    assert!(document.history.is_empty());
}

#[tokio::test]
async fn test_chart_over_stored_history() {
    let (store, repository) = common::measurements_setup();
    let Value::Object(document) = json!({
        "current": {},
        "goals": {},
        "history": [
            { "date": "2023-12-01", "hips": 104, "waist": 82 },
            { "date": "2024-04-20", "hips": 101, "waist": null },
            { "date": "2024-05-10", "hips": 100.5, "waist": 79 },
            { "date": "not a date", "hips": 1 }
        ]
    }) else {
        unreachable!()
    };
    store
        .set_document(&DocumentKey::measurements("uid-5"), &document, false)
        .await
        .unwrap();

    let document = repository.load("uid-5").await.unwrap();
    assert_eq!(document.history.len(), 3);

    let today = common::date("2024-05-15");
    let all = chart_series(&document, &DEFAULT_CHART_FIELDS, TimeRange::All, today);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].points.len(), 3);

    let recent = chart_series(&document, &DEFAULT_CHART_FIELDS, TimeRange::Month, today);
    let waist: Vec<Option<f64>> = recent[1].points.iter().map(|point| point.value).collect();
    assert_eq!(waist, [None, Some(79.0)]);
    assert_eq!(recent[1].color, all[1].color);
}
