// ABOUTME: Main library entry point for the bodyplan workout planner
// ABOUTME: Weekly workout plans, body measurements, interval timer, and their remote services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![deny(unsafe_code)]

//! # Bodyplan
//!
//! Personal fitness tracking: a weekly workout plan per user, body measurements
//! with progress charts, and a countdown timer/stopwatch used during workouts.
//!
//! ## Architecture
//!
//! - **Models** (`bodyplan-core`): exercises, plans and measurements with their pure
//!   list operations
//! - **Storage**: one JSON document per user and collection, kept in memory or in
//!   Firestore
//! - **Workouts** / **Measurements**: load, edit and save the user's documents
//! - **Timer**: countdown and stopwatch state machine driven by the tokio clock
//! - **Auth** / **Media**: identity provider and image host behind async traits
//! - **Config** / **Logging**: environment-driven setup and structured tracing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bodyplan::config::AppConfig;
//! use bodyplan::errors::AppResult;
//! use bodyplan::models::{ExerciseDraft, Weekday};
//! use bodyplan::storage::Store;
//! use bodyplan::workouts::{PlanEditor, WorkoutRepository};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = AppConfig::from_env()?;
//!     let store = Store::new(&config)?;
//!
//!     let mut editor = PlanEditor::open(WorkoutRepository::new(store), "uid-123").await?;
//!     editor.add(Weekday::Monday, ExerciseDraft::new("Glute Bridges"))?;
//!     editor.save().await?;
//!     Ok(())
//! }
//! ```

/// Identity provider, signed-in session and account forms
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants (re-exported from `bodyplan-core`)
pub mod constants;

/// Unified error handling (re-exported from `bodyplan-core`)
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Measurement persistence and progress charts
pub mod measurements;

/// Profile picture uploads
pub mod media;

/// Data models (re-exported from `bodyplan-core`)
pub mod models;

/// Per-user document storage backends
pub mod storage;

/// Shared test fixtures
pub mod test_utils;

/// Countdown timer and stopwatch
pub mod timer;

/// HTTP client presets and video link helpers
pub mod utils;

/// Workout plan persistence, editing and catalog
pub mod workouts;

/// Clock rendering of timer values
pub use bodyplan_core::formatters;
pub use bodyplan_core::formatters::format_clock;
