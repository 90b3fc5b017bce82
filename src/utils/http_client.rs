// ABOUTME: HTTP client construction with timeout presets and transport error mapping
// ABOUTME: Clients for the identity provider, the document store and the media host
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::errors::AppError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for sign-in and account updates, which should be fast
#[must_use]
pub fn auth_client() -> Client {
    create_client_with_timeout(15, 5)
}

/// Client for document reads and writes
#[must_use]
pub fn document_client() -> Client {
    create_client_with_timeout(30, 10)
}

/// Client for image uploads; no overall timeout so slow links can finish
#[must_use]
pub fn upload_client() -> Client {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a transport failure (connect, timeout, body) to an unavailable-service error
pub fn transport_error(service: &str, error: reqwest::Error) -> AppError {
    let reason = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    AppError::external_unavailable(service, reason).with_source(error)
}
