// ABOUTME: Shared helpers for integration tests
// ABOUTME: Quiet logging, in-memory stores and repositories, and fixed dates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    dead_code,
    missing_docs
)]

use bodyplan::measurements::MeasurementsRepository;
use bodyplan::storage::InMemoryDocumentStore;
use bodyplan::workouts::WorkoutRepository;
use chrono::NaiveDate;

pub use bodyplan::test_utils::init_test_logging;

/// Fresh store with a workout repository sharing it
pub fn workout_setup() -> (InMemoryDocumentStore, WorkoutRepository<InMemoryDocumentStore>) {
    init_test_logging();
    let store = InMemoryDocumentStore::new();
    (store.clone(), WorkoutRepository::new(store))
}

/// Fresh store with a measurements repository sharing it
pub fn measurements_setup() -> (
    InMemoryDocumentStore,
    MeasurementsRepository<InMemoryDocumentStore>,
) {
    init_test_logging();
    let store = InMemoryDocumentStore::new();
    (store.clone(), MeasurementsRepository::new(store))
}

/// Parse a `YYYY-MM-DD` date
pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}
