// ABOUTME: Application constants re-exported from bodyplan-core
// ABOUTME: Collections, defaults, timer bounds, media limits and chart palette
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

pub use bodyplan_core::constants::*;
