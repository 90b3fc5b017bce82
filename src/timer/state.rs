// ABOUTME: Countdown and stopwatch state machine for the workout timer
// ABOUTME: Pure transitions (start, pause, reset, tick, mode, duration) that emit timer events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::constants::timer::{DEFAULT_DURATION_SECS, MAX_DURATION_SECS};
use crate::errors::{AppError, AppResult};
use crate::formatters::format_clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the timer measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Counts down from the configured duration and completes at zero
    #[default]
    Countdown,
    /// Counts up from zero without limit
    Stopwatch,
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Countdown => f.write_str("countdown"),
            Self::Stopwatch => f.write_str("stopwatch"),
        }
    }
}

/// Whether the timer is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Not advancing
    Idle,
    /// Advancing once per tick
    Running,
}

/// Signals emitted by timer transitions
///
/// `seconds` is the displayed value: remaining time in countdown mode, elapsed
/// time in stopwatch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The timer began running
    Started {
        /// Active mode
        mode: TimerMode,
        /// Displayed seconds at start
        seconds: u32,
    },
    /// One second passed while running
    Tick {
        /// Active mode
        mode: TimerMode,
        /// Displayed seconds after the tick
        seconds: u32,
    },
    /// The timer stopped, keeping its value
    Paused {
        /// Active mode
        mode: TimerMode,
        /// Displayed seconds when paused
        seconds: u32,
    },
    /// The timer returned to its starting value
    Reset {
        /// Active mode
        mode: TimerMode,
        /// Displayed seconds after reset
        seconds: u32,
    },
    /// The mode switched; the value restarted for the new mode
    ModeChanged {
        /// New mode
        mode: TimerMode,
        /// Displayed seconds in the new mode
        seconds: u32,
    },
    /// The countdown reached zero and stopped
    Completed,
}

/// Serializable view of the timer for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Active mode
    pub mode: TimerMode,
    /// Running or idle
    pub status: TimerStatus,
    /// Displayed seconds
    pub seconds: u32,
    /// Countdown reset value
    pub configured_duration: u32,
    /// `MM:SS` rendering of `seconds`
    pub display: String,
}

/// Workout timer state machine
///
/// Transitions are total: every method is defined in every state. Only
/// [`WorkoutTimer::set_duration`] can reject its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutTimer {
    mode: TimerMode,
    running: bool,
    elapsed: u32,
    remaining: u32,
    configured_duration: u32,
}

impl Default for WorkoutTimer {
    fn default() -> Self {
        Self {
            mode: TimerMode::Countdown,
            running: false,
            elapsed: 0,
            remaining: DEFAULT_DURATION_SECS,
            configured_duration: DEFAULT_DURATION_SECS,
        }
    }
}

impl WorkoutTimer {
    /// Idle countdown timer set to `duration_secs`
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` unless `1 <= duration_secs <= 86400`
    pub fn new(duration_secs: u32) -> AppResult<Self> {
        validate_duration(duration_secs)?;
        Ok(Self {
            remaining: duration_secs,
            configured_duration: duration_secs,
            ..Self::default()
        })
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Running or idle
    #[must_use]
    pub const fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Idle
        }
    }

    /// Whether the timer is advancing
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds counted up in stopwatch mode
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Seconds left in countdown mode
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Countdown reset value
    #[must_use]
    pub const fn configured_duration(&self) -> u32 {
        self.configured_duration
    }

    /// Value shown to the user for the active mode
    #[must_use]
    pub const fn display_seconds(&self) -> u32 {
        match self.mode {
            TimerMode::Countdown => self.remaining,
            TimerMode::Stopwatch => self.elapsed,
        }
    }

    /// `MM:SS` rendering of [`WorkoutTimer::display_seconds`]
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.display_seconds())
    }

    /// Serializable view of the current state
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            status: self.status(),
            seconds: self.display_seconds(),
            configured_duration: self.configured_duration,
            display: self.display(),
        }
    }

    /// Idle to running; `None` when already running
    ///
    /// A finished countdown (zero remaining) restarts from the configured duration.
    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.running {
            return None;
        }
        if self.mode == TimerMode::Countdown && self.remaining == 0 {
            self.remaining = self.configured_duration;
        }
        self.running = true;
        Some(TimerEvent::Started {
            mode: self.mode,
            seconds: self.display_seconds(),
        })
    }

    /// Running to idle, keeping the current value; `None` when already idle
    pub fn pause(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(TimerEvent::Paused {
            mode: self.mode,
            seconds: self.display_seconds(),
        })
    }

    /// Stop and return to the starting value of the active mode
    pub fn reset(&mut self) -> TimerEvent {
        self.running = false;
        match self.mode {
            TimerMode::Countdown => self.remaining = self.configured_duration,
            TimerMode::Stopwatch => self.elapsed = 0,
        }
        TimerEvent::Reset {
            mode: self.mode,
            seconds: self.display_seconds(),
        }
    }

    /// Advance by one second; `None` when idle
    ///
    /// A countdown that reaches zero stops and yields [`TimerEvent::Completed`]
    /// exactly once.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        match self.mode {
            TimerMode::Stopwatch => {
                self.elapsed = self.elapsed.saturating_add(1);
            }
            TimerMode::Countdown => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.running = false;
                    return Some(TimerEvent::Completed);
                }
            }
        }
        Some(TimerEvent::Tick {
            mode: self.mode,
            seconds: self.display_seconds(),
        })
    }

    /// Switch mode, pausing first if running
    ///
    /// Countdown restarts from the configured duration and stopwatch from zero.
    /// Selecting the active mode changes nothing and returns `None`.
    pub fn set_mode(&mut self, mode: TimerMode) -> Option<TimerEvent> {
        if mode == self.mode {
            return None;
        }
        self.running = false;
        self.mode = mode;
        match mode {
            TimerMode::Countdown => self.remaining = self.configured_duration,
            TimerMode::Stopwatch => self.elapsed = 0,
        }
        Some(TimerEvent::ModeChanged {
            mode,
            seconds: self.display_seconds(),
        })
    }

    /// Change the countdown duration
    ///
    /// An idle countdown shows the new value immediately; a running countdown keeps
    /// its remaining time and uses the new value on its next reset.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` unless `1 <= seconds <= 86400`; the timer is unchanged
    pub fn set_duration(&mut self, seconds: u32) -> AppResult<()> {
        validate_duration(seconds)?;
        self.configured_duration = seconds;
        if !self.running && self.mode == TimerMode::Countdown {
            self.remaining = seconds;
        }
        Ok(())
    }
}

fn validate_duration(seconds: u32) -> AppResult<()> {
    if (1..=MAX_DURATION_SECS).contains(&seconds) {
        Ok(())
    } else {
        Err(AppError::value_out_of_range(format!(
            "Timer duration must be between 1 and {MAX_DURATION_SECS} seconds, got {seconds}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn running_countdown(seconds: u32) -> WorkoutTimer {
        let mut timer = WorkoutTimer::new(seconds).unwrap();
        timer.start();
        timer
    }

    #[test]
    fn test_start_resumes_or_restarts_countdown() {
        let mut timer = running_countdown(5);
        timer.tick();
        timer.pause();
        assert_eq!(
            timer.start(),
            Some(TimerEvent::Started {
                mode: TimerMode::Countdown,
                seconds: 4
            })
        );

        let mut finished = running_countdown(1);
        assert_eq!(finished.tick(), Some(TimerEvent::Completed));
        assert_eq!(finished.remaining(), 0);
        finished.start();
        assert_eq!(finished.remaining(), 1);
        assert!(finished.is_running());
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut timer = running_countdown(10);
        assert_eq!(timer.start(), None);
        assert!(timer.is_running());
    }

    #[test]
    fn test_countdown_completes_exactly_once() {
        let mut timer = running_countdown(3);
        assert_eq!(
            timer.tick(),
            Some(TimerEvent::Tick {
                mode: TimerMode::Countdown,
                seconds: 2
            })
        );
        assert!(matches!(timer.tick(), Some(TimerEvent::Tick { seconds: 1, .. })));
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_stopwatch_counts_up() {
        let mut timer = WorkoutTimer::default();
        timer.set_mode(TimerMode::Stopwatch);
        timer.start();
        for _ in 0..125 {
            timer.tick();
        }
        assert_eq!(timer.elapsed(), 125);
        assert_eq!(timer.display(), "02:05");
        timer.pause();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.elapsed(), 125);
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut timer = running_countdown(30);
        timer.tick();
        assert_eq!(
            timer.reset(),
            TimerEvent::Reset {
                mode: TimerMode::Countdown,
                seconds: 30
            }
        );
        assert!(!timer.is_running());

        timer.set_mode(TimerMode::Stopwatch);
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::Stopwatch);
        assert_eq!(timer.elapsed(), 0);
    }

    #[test]
    fn test_set_mode_pauses_running_timer() {
        let mut timer = running_countdown(30);
        timer.tick();
        let event = timer.set_mode(TimerMode::Stopwatch);
        assert_eq!(
            event,
            Some(TimerEvent::ModeChanged {
                mode: TimerMode::Stopwatch,
                seconds: 0
            })
        );
        assert!(!timer.is_running());

        timer.set_mode(TimerMode::Countdown);
        assert_eq!(timer.remaining(), 30);
        assert_eq!(timer.set_mode(TimerMode::Countdown), None);
    }

    #[test]
    fn test_set_duration_updates_idle_countdown_only() {
        let mut timer = WorkoutTimer::default();
        timer.set_duration(90).unwrap();
        assert_eq!(timer.remaining(), 90);

        timer.start();
        timer.tick();
        timer.set_duration(45).unwrap();
        assert_eq!(timer.remaining(), 89);
        assert_eq!(timer.configured_duration(), 45);
        timer.reset();
        assert_eq!(timer.remaining(), 45);
    }

    #[test]
    fn test_set_duration_rejects_out_of_range() {
        let mut timer = WorkoutTimer::default();
        for invalid in [0, MAX_DURATION_SECS + 1] {
            let err = timer.set_duration(invalid).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        }
        assert_eq!(timer, WorkoutTimer::default());
        assert!(WorkoutTimer::new(0).is_err());
    }

    #[test]
    fn test_snapshot_renders_clock() {
        let timer = WorkoutTimer::new(75).unwrap();
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.display, "01:15");
        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert_eq!(snapshot.configured_duration, 75);
    }
}
