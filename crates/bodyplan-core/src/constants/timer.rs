// ABOUTME: Timer constants for countdown duration bounds and tick cadence
// ABOUTME: Shared by the timer state machine and the environment configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

/// Countdown duration used when none is configured
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Longest accepted countdown duration (24 hours)
pub const MAX_DURATION_SECS: u32 = 86_400;

/// Interval between ticks while the timer runs
pub const TICK_INTERVAL_MILLIS: u64 = 1_000;

/// Capacity of the timer event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Alert tone frequency in hertz
pub const ALERT_TONE_HZ: u32 = 880;

/// Length of a single alert beep
pub const ALERT_BEEP_MILLIS: u64 = 200;

/// Silence between alert beeps
pub const ALERT_GAP_MILLIS: u64 = 150;

/// Number of beeps in the completion alert
pub const ALERT_BEEP_COUNT: u32 = 3;
