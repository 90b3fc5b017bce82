// ABOUTME: Integration tests for the tokio timer driver and completion alert
// ABOUTME: Uses a paused tokio clock to check tick cadence, cancellation, and the beep pattern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use bodyplan::config::TimerConfig;
use bodyplan::test_utils::RecordingAlertPlayer;
use bodyplan::timer::{
    spawn_alert_listener, AlertPattern, TimerDriver, TimerEvent, TimerMode, TimerStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::sleep;

fn driver(duration_secs: u32) -> TimerDriver {
    common::init_test_logging();
    TimerDriver::new(&TimerConfig {
        default_duration_secs: duration_secs,
        ..TimerConfig::default()
    })
    .unwrap()
}

fn drain(events: &mut broadcast::Receiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut received = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => received.push(event),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return received,
            Err(TryRecvError::Lagged(skipped)) => panic!("missed {skipped} events"),
        }
    }
}

fn tick(seconds: u32) -> TimerEvent {
    TimerEvent::Tick {
        mode: TimerMode::Countdown,
        seconds,
    }
}

#[tokio::test(start_paused = true)]
async fn test_countdown_runs_to_completion_once() {
    let driver = driver(5);
    let mut events = driver.subscribe();

    driver.start();
    sleep(Duration::from_millis(5_500)).await;

    assert_eq!(
        drain(&mut events),
        [
            TimerEvent::Started {
                mode: TimerMode::Countdown,
                seconds: 5
            },
            tick(4),
            tick(3),
            tick(2),
            tick(1),
            TimerEvent::Completed,
        ]
    );
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.status, TimerStatus::Idle);
    assert_eq!(snapshot.display, "00:00");
    assert!(!driver.is_ticking());

    sleep(Duration::from_secs(3)).await;
    assert!(drain(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_completion_uses_configured_duration() {
    let driver = driver(2);
    driver.start();
    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(driver.snapshot().seconds, 0);

    driver.start();
    assert_eq!(driver.snapshot().seconds, 2);
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(driver.snapshot().seconds, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks_immediately() {
    let driver = driver(10);
    let mut events = driver.subscribe();

    driver.start();
    sleep(Duration::from_millis(1_500)).await;
    driver.pause();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(driver.snapshot().seconds, 9);
    assert!(!driver.is_ticking());
    assert_eq!(
        drain(&mut events).last(),
        Some(&TimerEvent::Paused {
            mode: TimerMode::Countdown,
            seconds: 9
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_start_keeps_single_tick_source() {
    let driver = driver(10);
    driver.start();
    driver.start();
    driver.start();

    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(driver.snapshot().seconds, 8);
}

#[tokio::test(start_paused = true)]
async fn test_resume_restarts_tick_phase() {
    let driver = driver(10);
    driver.start();
    sleep(Duration::from_millis(500)).await;
    driver.pause();
    driver.start();

    sleep(Duration::from_millis(700)).await;
    assert_eq!(driver.snapshot().seconds, 10);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(driver.snapshot().seconds, 9);
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_running() {
    let driver = driver(30);
    driver.start();
    sleep(Duration::from_millis(3_500)).await;
    driver.reset();

    let snapshot = driver.snapshot();
    assert_eq!(snapshot.seconds, 30);
    assert_eq!(snapshot.status, TimerStatus::Idle);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(driver.snapshot().seconds, 30);
}

#[tokio::test(start_paused = true)]
async fn test_mode_switch_pauses_then_switches() {
    let driver = driver(30);
    let mut events = driver.subscribe();
    driver.start();
    sleep(Duration::from_millis(1_500)).await;
    drain(&mut events);

    driver.set_mode(TimerMode::Stopwatch);
    assert_eq!(
        drain(&mut events),
        [
            TimerEvent::Paused {
                mode: TimerMode::Countdown,
                seconds: 29
            },
            TimerEvent::ModeChanged {
                mode: TimerMode::Stopwatch,
                seconds: 0
            },
        ]
    );
    assert!(!driver.is_ticking());

    driver.start();
    sleep(Duration::from_millis(65_500)).await;
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.mode, TimerMode::Stopwatch);
    assert_eq!(snapshot.display, "01:05");
}

#[tokio::test(start_paused = true)]
async fn test_set_duration_validation() {
    let driver = driver(60);
    assert!(driver.set_duration(0).is_err());
    assert!(driver.set_duration(86_401).is_err());
    assert_eq!(driver.snapshot().configured_duration, 60);

    driver.set_duration(90).unwrap();
    assert_eq!(driver.snapshot().display, "01:30");
}

#[tokio::test(start_paused = true)]
async fn test_completion_plays_alert_pattern() {
    let driver = driver(2);
    let player = RecordingAlertPlayer::new();
    let pattern = AlertPattern::default();
    let listener = spawn_alert_listener(driver.subscribe(), Arc::new(player.clone()), pattern);

    driver.start();
    sleep(Duration::from_secs(4)).await;

    let tones = player.tones();
    assert_eq!(tones.len(), 3);
    assert!(tones.iter().all(|tone| tone.frequency_hz == 880));
    assert!(tones.iter().all(|tone| tone.duration == pattern.beep));
    assert!(tones[1].at - tones[0].at >= pattern.beep + pattern.gap);

    drop(driver);
    tokio::time::timeout(Duration::from_secs(1), listener)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pause_before_completion_plays_nothing() {
    let driver = driver(3);
    let player = RecordingAlertPlayer::new();
    let _listener = spawn_alert_listener(
        driver.subscribe(),
        Arc::new(player.clone()),
        AlertPattern::default(),
    );

    driver.start();
    sleep(Duration::from_millis(2_500)).await;
    driver.pause();
    sleep(Duration::from_secs(5)).await;

    assert!(player.tones().is_empty());
}
