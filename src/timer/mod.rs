// ABOUTME: Workout countdown timer and stopwatch
// ABOUTME: State machine, tokio tick driver, and audible completion alert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Timer
//!
//! [`WorkoutTimer`] holds the pure state machine and can be driven by hand.
//! [`TimerDriver`] runs it against the tokio clock with a single tick task and
//! publishes [`TimerEvent`]s; [`spawn_alert_listener`] turns completions into a
//! beep pattern.

/// Completion alert playback
pub mod alerts;
/// Tokio tick driver
pub mod driver;
/// Countdown and stopwatch transitions
pub mod state;

pub use alerts::{spawn_alert_listener, AlertPattern, AlertPlayer, SilentAlertPlayer};
pub use driver::TimerDriver;
pub use state::{TimerEvent, TimerMode, TimerSnapshot, TimerStatus, WorkoutTimer};
