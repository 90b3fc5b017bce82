// ABOUTME: Shared fixtures for unit and integration tests
// ABOUTME: Quiet test logging, sample exercises, a failing document store, and a recording alert player
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{ExerciseDraft, TimeUnit};
use crate::storage::{Document, DocumentKey, DocumentStore};
use crate::timer::AlertPlayer;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Install a quiet test subscriber once per process
///
/// `TEST_LOG` (`TRACE`, `DEBUG`, `INFO`) raises the level; the default is `WARN`.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        // Another subscriber may already be installed by the test harness
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Bodyweight squat with catalog defaults
#[must_use]
pub fn squat_draft() -> ExerciseDraft {
    ExerciseDraft::new("Bodyweight Squats")
        .with_sets(3)
        .with_reps("12-15")
        .with_description("Feet shoulder-width apart, sit back and down")
}

/// Timed plank hold
#[must_use]
pub fn plank_draft() -> ExerciseDraft {
    ExerciseDraft::new("Plank")
        .with_sets(3)
        .with_reps("")
        .with_time(30.0, TimeUnit::Seconds)
}

/// Push-ups with a video link
#[must_use]
pub fn push_up_draft() -> ExerciseDraft {
    ExerciseDraft::new("Push-ups")
        .with_sets(4)
        .with_reps("8-10")
        .with_video_url("https://www.youtube.com/watch?v=IODxDxX7oi4")
}

/// Document store whose every call fails with the same error code
#[derive(Debug, Clone)]
pub struct FailingDocumentStore {
    code: ErrorCode,
    calls: Arc<AtomicUsize>,
}

impl FailingDocumentStore {
    /// Store failing with `code`
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Store that cannot be reached
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(ErrorCode::StorageUnavailable)
    }

    /// Store that rejects the caller's credentials
    #[must_use]
    pub fn denied() -> Self {
        Self::new(ErrorCode::PermissionDenied)
    }

    /// Number of calls attempted
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self, key: &DocumentKey) -> AppError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AppError::new(self.code, format!("Simulated failure for {key}"))
    }
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn get_document(&self, key: &DocumentKey) -> AppResult<Option<Document>> {
        Err(self.fail(key))
    }

    async fn set_document(&self, key: &DocumentKey, _document: &Document, _merge: bool) -> AppResult<()> {
        Err(self.fail(key))
    }

    async fn health_check(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::new(self.code, "Simulated health check failure"))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// One tone requested from a [`RecordingAlertPlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedTone {
    /// Frequency in hertz
    pub frequency_hz: u32,
    /// Requested length
    pub duration: Duration,
    /// Tokio clock reading when the tone started
    pub at: tokio::time::Instant,
}

/// Alert player that records tones instead of playing them
#[derive(Debug, Clone, Default)]
pub struct RecordingAlertPlayer {
    tones: Arc<Mutex<Vec<PlayedTone>>>,
}

impl RecordingAlertPlayer {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tones played so far
    #[must_use]
    pub fn tones(&self) -> Vec<PlayedTone> {
        self.tones
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AlertPlayer for RecordingAlertPlayer {
    async fn play_tone(&self, frequency_hz: u32, duration: Duration) -> AppResult<()> {
        self.tones
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PlayedTone {
                frequency_hz,
                duration,
                at: tokio::time::Instant::now(),
            });
        Ok(())
    }
}
