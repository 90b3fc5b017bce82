// ABOUTME: Measurement chart constants
// ABOUTME: Fixed color palette so chart series render identically on every draw
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

/// One color per measurement field, in field declaration order
pub const SERIES_PALETTE: [&str; 6] = [
    "hsl(0, 70%, 50%)",
    "hsl(30, 70%, 50%)",
    "hsl(120, 70%, 40%)",
    "hsl(200, 70%, 50%)",
    "hsl(260, 70%, 55%)",
    "hsl(320, 70%, 50%)",
];

/// Unit shown next to every measurement value
pub const MEASUREMENT_UNIT: &str = "cm";
