// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses Firebase, Cloudinary, storage backend and timer settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! Environment-based configuration

use crate::constants::{media, timer};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Default Identity Toolkit endpoint
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
/// Default Firestore REST endpoint
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
/// Default Cloudinary upload API endpoint
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Which document store backs persistence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// Cloud Firestore over REST
    Firestore,
}

impl StorageBackend {
    /// Parse `BODYPLAN_STORAGE`, returning `None` for unrecognised values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Some(Self::Memory),
            "firestore" | "firebase" => Some(Self::Firestore),
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Firestore => write!(f, "firestore"),
        }
    }
}

/// Firebase project settings shared by the identity client and the Firestore store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Firebase project ID
    pub project_id: Option<String>,
    /// Web API key used by the Identity Toolkit endpoints
    pub api_key: Option<String>,
    /// Whether Firebase integration is enabled
    pub enabled: bool,
    /// Firestore database name
    pub database_id: String,
    /// Identity Toolkit base URL
    pub identity_base_url: String,
    /// Firestore REST base URL
    pub firestore_base_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            enabled: false,
            database_id: "(default)".to_owned(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_owned(),
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_owned(),
        }
    }
}

impl FirebaseConfig {
    /// Check if Firebase is enabled and has a project ID
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.enabled && self.project_id.is_some()
    }

    /// Load Firebase configuration from environment
    ///
    /// Environment variables:
    /// - `FIREBASE_PROJECT_ID` - project ID
    /// - `FIREBASE_API_KEY` - web API key
    /// - `FIREBASE_ENABLED` - defaults to true when a project ID is set
    /// - `FIRESTORE_DATABASE_ID` - defaults to `(default)`
    /// - `FIREBASE_AUTH_BASE_URL`, `FIRESTORE_BASE_URL` - endpoint overrides
    #[must_use]
    pub fn from_env() -> Self {
        let project_id = non_empty_var("FIREBASE_PROJECT_ID");
        let api_key = non_empty_var("FIREBASE_API_KEY");

        let enabled = project_id.is_some()
            && env_var_or("FIREBASE_ENABLED", "true")
                .parse()
                .unwrap_or(true);

        if enabled {
            info!(
                project_id = project_id.as_deref().unwrap_or("(not set)"),
                "Firebase integration enabled"
            );
        }

        Self {
            project_id,
            api_key,
            enabled,
            database_id: env_var_or("FIRESTORE_DATABASE_ID", "(default)"),
            identity_base_url: env_var_or("FIREBASE_AUTH_BASE_URL", DEFAULT_IDENTITY_BASE_URL),
            firestore_base_url: env_var_or("FIRESTORE_BASE_URL", DEFAULT_FIRESTORE_BASE_URL),
        }
    }
}

/// Cloudinary unsigned upload settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Cloud name that prefixes the upload endpoint
    pub cloud_name: Option<String>,
    /// Unsigned upload preset
    pub upload_preset: Option<String>,
    /// Destination folder
    pub folder: String,
    /// Largest accepted image in bytes
    pub max_upload_bytes: u64,
    /// Upload API base URL
    pub api_base_url: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: None,
            folder: media::DEFAULT_UPLOAD_FOLDER.to_owned(),
            max_upload_bytes: media::MAX_UPLOAD_BYTES,
            api_base_url: DEFAULT_CLOUDINARY_BASE_URL.to_owned(),
        }
    }
}

impl CloudinaryConfig {
    /// Both the cloud name and the upload preset are present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.cloud_name.is_some() && self.upload_preset.is_some()
    }

    /// Load Cloudinary configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `CLOUDINARY_MAX_UPLOAD_BYTES` is not a positive integer
    pub fn from_env() -> AppResult<Self> {
        let max_upload_bytes = parse_var(
            "CLOUDINARY_MAX_UPLOAD_BYTES",
            media::MAX_UPLOAD_BYTES,
        )?;
        if max_upload_bytes == 0 {
            return Err(AppError::config(
                "CLOUDINARY_MAX_UPLOAD_BYTES must be greater than zero",
            ));
        }

        Ok(Self {
            cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
            upload_preset: non_empty_var("CLOUDINARY_UPLOAD_PRESET"),
            folder: env_var_or("CLOUDINARY_FOLDER", media::DEFAULT_UPLOAD_FOLDER),
            max_upload_bytes,
            api_base_url: env_var_or("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_BASE_URL),
        })
    }
}

/// Workout timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Countdown duration a fresh timer starts with
    pub default_duration_secs: u32,
    /// Tick cadence while running
    pub tick_interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: timer::DEFAULT_DURATION_SECS,
            tick_interval: Duration::from_millis(timer::TICK_INTERVAL_MILLIS),
        }
    }
}

impl TimerConfig {
    /// Load timer configuration from environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `TIMER_DEFAULT_DURATION_SECS` is not a number
    /// between 1 and the maximum countdown duration
    pub fn from_env() -> AppResult<Self> {
        let default_duration_secs =
            parse_var("TIMER_DEFAULT_DURATION_SECS", timer::DEFAULT_DURATION_SECS)?;
        if !(1..=timer::MAX_DURATION_SECS).contains(&default_duration_secs) {
            return Err(AppError::config(format!(
                "TIMER_DEFAULT_DURATION_SECS must be between 1 and {}",
                timer::MAX_DURATION_SECS
            )));
        }

        Ok(Self {
            default_duration_secs,
            ..Self::default()
        })
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Application log level
    pub log_level: LogLevel,
    /// Selected document store
    pub storage_backend: StorageBackend,
    /// Firebase settings
    pub firebase: FirebaseConfig,
    /// Cloudinary settings
    pub cloudinary: CloudinaryConfig,
    /// Timer settings
    pub timer: TimerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or required credentials are missing
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let firebase = FirebaseConfig::from_env();
        let storage_backend = match env::var("BODYPLAN_STORAGE") {
            Ok(value) => StorageBackend::parse(&value).ok_or_else(|| {
                AppError::config(format!(
                    "Invalid BODYPLAN_STORAGE value '{value}' (expected memory or firestore)"
                ))
            })?,
            Err(_) if firebase.is_configured() => StorageBackend::Firestore,
            Err(_) => StorageBackend::Memory,
        };

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            storage_backend,
            firebase,
            cloudinary: CloudinaryConfig::from_env()?,
            timer: TimerConfig::from_env()?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate that the selected backends have their credentials
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` naming the first absent variable
    pub fn validate(&self) -> AppResult<()> {
        if self.storage_backend == StorageBackend::Firestore {
            if self.firebase.project_id.is_none() {
                return Err(AppError::config_missing("FIREBASE_PROJECT_ID"));
            }
            if !self.firebase.enabled {
                return Err(AppError::config(
                    "Firestore storage selected but FIREBASE_ENABLED is false",
                ));
            }
        }

        if self.firebase.is_configured() && self.firebase.api_key.is_none() {
            return Err(AppError::config_missing("FIREBASE_API_KEY"));
        }

        if !self.cloudinary.is_configured() {
            warn!("Cloudinary is not configured; profile picture uploads are disabled");
        }

        Ok(())
    }

    /// One-line summary for logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} log_level={} storage={} firebase={} cloudinary={} timer_default={}s",
            self.environment,
            self.log_level,
            self.storage_backend,
            if self.firebase.is_configured() {
                "configured"
            } else {
                "disabled"
            },
            if self.cloudinary.is_configured() {
                "configured"
            } else {
                "disabled"
            },
            self.timer.default_duration_secs,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid {key} value '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(
            Environment::from_str_or_default("staging"),
            Environment::Development
        );
    }

    #[test]
    fn test_log_level_round_trips_display() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(LogLevel::from_str_or_default(&level.to_string()), level);
        }
        assert_eq!(LogLevel::from_str_or_default("loud"), LogLevel::Info);
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(StorageBackend::parse(" Memory "), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("firebase"), Some(StorageBackend::Firestore));
        assert_eq!(StorageBackend::parse("sqlite"), None);
    }

    #[test]
    fn test_firestore_backend_requires_project() {
        let config = AppConfig {
            storage_backend: StorageBackend::Firestore,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigMissing);
        assert!(err.message.contains("FIREBASE_PROJECT_ID"));
    }

    #[test]
    fn test_configured_firebase_requires_api_key() {
        let config = AppConfig {
            firebase: FirebaseConfig {
                project_id: Some("demo".to_owned()),
                enabled: true,
                ..FirebaseConfig::default()
            },
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("FIREBASE_API_KEY"));
    }

    #[test]
    fn test_default_config_is_valid_memory_setup() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.timer.default_duration_secs, 60);
        assert!(config.summary().contains("storage=memory"));
    }
}
