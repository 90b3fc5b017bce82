// ABOUTME: Core data models for the workout planner and measurement tracker
// ABOUTME: Re-exports exercise records, weekly plans, and measurement documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Data Models
//!
//! The two documents stored per user and the records they contain.
//!
//! ## Design Principles
//!
//! - **Lenient reads**: documents written by earlier clients carry numeric ids,
//!   numbers typed as strings and empty strings for absent values; all of them load
//! - **Strict writes**: every document written back has its full, canonical shape
//! - **Pure operations**: list edits never touch storage; callers decide when to save

mod exercise;
mod lenient;
mod measurements;
mod plan;

// Exercise domain
pub use exercise::{Exercise, ExerciseDraft, ExerciseId, ExercisePatch, TimeUnit};

// Weekly plan domain
pub use plan::{Weekday, WorkoutPlan};

// Measurement domain
pub use measurements::{
    MeasurementEntry, MeasurementField, MeasurementValues, MeasurementsDocument, TimeRange,
};
