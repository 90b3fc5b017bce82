// ABOUTME: Audible completion alert for the countdown timer
// ABOUTME: Plays a short beep pattern through a pluggable player when a countdown completes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use super::state::TimerEvent;
use crate::constants::timer::{
    ALERT_BEEP_COUNT, ALERT_BEEP_MILLIS, ALERT_GAP_MILLIS, ALERT_TONE_HZ,
};
use crate::errors::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sound output used for the completion alert
#[async_trait]
pub trait AlertPlayer: Send + Sync {
    /// Start a tone of `frequency_hz` lasting `duration`
    ///
    /// # Errors
    ///
    /// Returns an error when the audio device cannot play the tone
    async fn play_tone(&self, frequency_hz: u32, duration: Duration) -> AppResult<()>;
}

/// Player for environments without audio output
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlertPlayer;

#[async_trait]
impl AlertPlayer for SilentAlertPlayer {
    async fn play_tone(&self, frequency_hz: u32, duration: Duration) -> AppResult<()> {
        debug!(frequency_hz, ?duration, "Alert tone skipped, no audio output");
        Ok(())
    }
}

/// Beep sequence played on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPattern {
    /// Tone frequency
    pub tone_hz: u32,
    /// Length of each beep
    pub beep: Duration,
    /// Silence between beeps
    pub gap: Duration,
    /// Number of beeps
    pub count: u32,
}

impl Default for AlertPattern {
    fn default() -> Self {
        Self {
            tone_hz: ALERT_TONE_HZ,
            beep: Duration::from_millis(ALERT_BEEP_MILLIS),
            gap: Duration::from_millis(ALERT_GAP_MILLIS),
            count: ALERT_BEEP_COUNT,
        }
    }
}

impl AlertPattern {
    /// Play every beep of the pattern, waiting out each beep and gap
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `player`
    pub async fn play(&self, player: &dyn AlertPlayer) -> AppResult<()> {
        for beep in 0..self.count {
            player.play_tone(self.tone_hz, self.beep).await?;
            if beep + 1 < self.count {
                tokio::time::sleep(self.beep + self.gap).await;
            }
        }
        Ok(())
    }
}

/// Play `pattern` on every [`TimerEvent::Completed`] received
///
/// The task ends when the timer's event channel closes. Playback failures are
/// logged and never reach the timer.
pub fn spawn_alert_listener(
    mut events: broadcast::Receiver<TimerEvent>,
    player: Arc<dyn AlertPlayer>,
    pattern: AlertPattern,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(TimerEvent::Completed) => {
                    if let Err(e) = pattern.play(player.as_ref()).await {
                        warn!(error = %e, "Completion alert failed");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Alert listener lagged behind timer events");
                }
                Err(RecvError::Closed) => {
                    debug!("Timer event channel closed, alert listener stopping");
                    break;
                }
            }
        }
    })
}
