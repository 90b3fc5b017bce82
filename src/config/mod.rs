// ABOUTME: Configuration management module for bodyplan settings
// ABOUTME: Exposes environment-driven configuration for storage, identity, media and timer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! Configuration module
//!
//! All settings come from environment variables; there are no configuration files.
//!
//! - **Environment**: deployment mode and log level
//! - **Firebase**: identity provider and document store credentials
//! - **Cloudinary**: profile picture upload host
//! - **Timer**: default countdown duration and tick cadence

/// Environment-driven application configuration
/// Environment variable parsing and validation
pub mod environment;

pub use environment::{
    AppConfig, CloudinaryConfig, Environment, FirebaseConfig, LogLevel, StorageBackend,
    TimerConfig,
};
