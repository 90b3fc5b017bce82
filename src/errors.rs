// ABOUTME: Unified error types re-exported from bodyplan-core
// ABOUTME: AppError, ErrorCode, ErrorCategory and the AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

pub use bodyplan_core::errors::*;
