// ABOUTME: Tokio driver that advances the workout timer once per tick interval
// ABOUTME: Owns the single tick task and broadcasts timer events to subscribers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::state::{TimerEvent, TimerMode, TimerSnapshot, WorkoutTimer};
use crate::config::TimerConfig;
use crate::constants::timer::EVENT_CHANNEL_CAPACITY;
use crate::errors::{AppError, AppResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

struct DriverState {
    timer: WorkoutTimer,
    ticker: Option<JoinHandle<()>>,
    // Bumped whenever the tick task is replaced or cancelled; a task holding an
    // older value exits without touching the timer.
    generation: u64,
}

impl DriverState {
    fn cancel_ticker(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// Runs a [`WorkoutTimer`] against the tokio clock
///
/// At most one tick task exists at a time. Pausing, resetting, switching mode or
/// dropping the driver cancels it before returning, so no tick lands afterwards.
pub struct TimerDriver {
    state: Arc<Mutex<DriverState>>,
    events: broadcast::Sender<TimerEvent>,
    runtime: Handle,
    tick_interval: Duration,
}

impl TimerDriver {
    /// Idle countdown driver using the configured duration and tick cadence
    ///
    /// # Errors
    ///
    /// Returns a configuration error when called outside a tokio runtime or when
    /// the configured duration is out of range
    pub fn new(config: &TimerConfig) -> AppResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| AppError::config("Timer requires a tokio runtime").with_source(e))?;
        let timer = WorkoutTimer::new(config.default_duration_secs)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            state: Arc::new(Mutex::new(DriverState {
                timer,
                ticker: None,
                generation: 0,
            })),
            events,
            runtime,
            tick_interval: config.tick_interval,
        })
    }

    /// Receive every event emitted after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    /// Current timer state
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().timer.snapshot()
    }

    /// Whether a tick task is currently scheduled
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.lock().ticker.is_some()
    }

    /// Start or resume; does nothing when already running
    pub fn start(&self) {
        let mut state = self.lock();
        let Some(event) = state.timer.start() else {
            return;
        };

        state.cancel_ticker();
        let generation = state.generation;
        state.ticker = Some(self.runtime.spawn(run_ticker(
            Arc::clone(&self.state),
            self.events.clone(),
            self.tick_interval,
            generation,
        )));
        debug!(mode = %state.timer.mode(), "Timer started");
        self.emit(event);
    }

    /// Stop ticking and keep the current value
    pub fn pause(&self) {
        let mut state = self.lock();
        state.cancel_ticker();
        if let Some(event) = state.timer.pause() {
            self.emit(event);
        }
    }

    /// Stop ticking and return to the starting value of the active mode
    pub fn reset(&self) {
        let mut state = self.lock();
        state.cancel_ticker();
        let event = state.timer.reset();
        self.emit(event);
    }

    /// Switch mode, pausing first when running
    pub fn set_mode(&self, mode: TimerMode) {
        let mut state = self.lock();
        if state.timer.mode() == mode {
            return;
        }
        state.cancel_ticker();
        if let Some(event) = state.timer.pause() {
            self.emit(event);
        }
        if let Some(event) = state.timer.set_mode(mode) {
            info!(%mode, "Timer mode changed");
            self.emit(event);
        }
    }

    /// Change the countdown duration
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` unless `1 <= seconds <= 86400`
    pub fn set_duration(&self, seconds: u32) -> AppResult<()> {
        self.lock().timer.set_duration(seconds)
    }

    fn lock(&self) -> MutexGuard<'_, DriverState> {
        lock_state(&self.state)
    }

    fn emit(&self, event: TimerEvent) {
        // No receivers is fine; the timer runs without a view attached
        let _ = self.events.send(event);
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        lock_state(&self.state).cancel_ticker();
    }
}

fn lock_state(state: &Mutex<DriverState>) -> MutexGuard<'_, DriverState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_ticker(
    state: Arc<Mutex<DriverState>>,
    events: broadcast::Sender<TimerEvent>,
    period: Duration,
    generation: u64,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !advance(&state, &events, generation) {
            return;
        }
    }
}

/// Apply one tick; `false` once this task should stop
fn advance(
    state: &Mutex<DriverState>,
    events: &broadcast::Sender<TimerEvent>,
    generation: u64,
) -> bool {
    let mut guard = lock_state(state);
    if guard.generation != generation {
        return false;
    }
    let Some(event) = guard.timer.tick() else {
        guard.ticker = None;
        return false;
    };
    // Sent under the lock so ticks never overtake a later pause or reset
    let _ = events.send(event);

    if event == TimerEvent::Completed {
        guard.ticker = None;
        info!("Countdown completed");
        return false;
    }
    true
}
