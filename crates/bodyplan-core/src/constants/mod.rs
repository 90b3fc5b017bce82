// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for exercises, timers, documents, auth, and media uploads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Timer bounds and defaults
pub mod timer;

/// Measurement chart palette
pub mod measurements;

/// Exercise form defaults
pub mod exercise {
    /// Default number of sets for a new exercise
    pub const DEFAULT_SETS: u32 = 3;
    /// Default repetition target for a new exercise
    pub const DEFAULT_REPS: &str = "10-12";
}

/// Document store layout
pub mod documents {
    /// Collection holding one workout plan per user
    pub const WORKOUTS_COLLECTION: &str = "workouts";
    /// Collection holding one measurements document per user
    pub const MEASUREMENTS_COLLECTION: &str = "users";
}

/// Video link recognition
pub mod video {
    /// Length of a YouTube video identifier
    pub const YOUTUBE_ID_LEN: usize = 11;
    /// Thumbnail URL prefix; the identifier and `THUMBNAIL_SUFFIX` follow
    pub const THUMBNAIL_PREFIX: &str = "https://img.youtube.com/vi/";
    /// Medium quality thumbnail image name
    pub const THUMBNAIL_SUFFIX: &str = "/mqdefault.jpg";
}

/// Identity provider rules
pub mod auth {
    /// Minimum accepted password length
    pub const MIN_PASSWORD_LEN: usize = 6;
}

/// Media upload limits
pub mod media {
    /// Maximum accepted image size (5 MiB)
    pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
    /// Chunk size used when streaming uploads (progress granularity)
    pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;
    /// Folder receiving profile pictures
    pub const DEFAULT_UPLOAD_FOLDER: &str = "profile_pictures";
    /// Tags attached to profile pictures
    pub const PROFILE_PICTURE_TAGS: &str = "profile,avatar";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Service name for the bodyplan library
    pub const BODYPLAN: &str = "bodyplan";
}
