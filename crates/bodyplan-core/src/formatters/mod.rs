// ABOUTME: Clock-style rendering of timer values
// ABOUTME: Converts whole seconds into zero-padded MM:SS strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

/// Render whole seconds as `MM:SS`.
///
/// Both components are zero-padded to two digits. Minutes are not wrapped into
/// hours, so values of 6000 seconds or more produce three or more minute digits.
///
/// ```
/// use bodyplan_core::formatters::format_clock;
///
/// assert_eq!(format_clock(0), "00:00");
/// assert_eq!(format_clock(75), "01:15");
/// assert_eq!(format_clock(6000), "100:00");
/// ```
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{minutes:02}:{secs:02}")
}
