// ABOUTME: Utility modules shared across the bodyplan library
// ABOUTME: HTTP client construction and video link recognition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

/// Shared HTTP clients with timeout presets for remote collaborators
pub mod http_client;
/// YouTube link recognition and thumbnail derivation
pub mod youtube;

pub use youtube::youtube_thumbnail;
