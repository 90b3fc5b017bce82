// ABOUTME: Weekly workout planning on top of the document store
// ABOUTME: Persistence bridge, editing session with explicit save, and exercise catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Workouts
//!
//! The plan model and its list operations live in [`crate::models`]. This module
//! connects them to storage: [`WorkoutRepository`] loads and saves whole plans,
//! [`PlanEditor`] keeps edits in memory until the user saves, and [`catalog`]
//! offers ready-made exercises.

/// Suggested beginner exercises
pub mod catalog;
/// In-memory editing session with explicit save
pub mod editor;
/// Load and save of the per-user plan document
pub mod repository;

pub use editor::PlanEditor;
pub use repository::WorkoutRepository;
