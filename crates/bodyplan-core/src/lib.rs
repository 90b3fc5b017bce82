// ABOUTME: Core types and constants for the bodyplan workout planner
// ABOUTME: Foundation crate with error handling, data models, and clock formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![deny(unsafe_code)]

//! # Bodyplan Core
//!
//! Foundation crate providing shared types and constants for the bodyplan
//! workout planner. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorCategory`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Exercise records, weekly workout plans, and body measurements
//! - **formatters**: Clock-style rendering of timer values

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Exercise, `WorkoutPlan`, measurements)
pub mod models;

/// Display formatting for timer values
pub mod formatters;
