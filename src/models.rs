// ABOUTME: Data models re-exported from bodyplan-core
// ABOUTME: Exercises, weekly workout plans and body measurement documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

pub use bodyplan_core::models::*;
