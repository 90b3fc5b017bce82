// ABOUTME: Body measurement progress charts and persistence
// ABOUTME: Builds deterministic per-field chart series from filtered measurement history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

//! # Measurements
//!
//! The document model lives in [`crate::models`]. This module turns history into
//! chart series and stores the document through [`MeasurementsRepository`].

/// Load and save of the per-user measurements document
pub mod repository;

pub use repository::MeasurementsRepository;

use crate::constants::measurements::SERIES_PALETTE;
use crate::models::{MeasurementField, MeasurementsDocument, TimeRange};
use chrono::NaiveDate;
use serde::Serialize;

/// Fields charted before the user picks any
pub const DEFAULT_CHART_FIELDS: [MeasurementField; 2] =
    [MeasurementField::Hips, MeasurementField::Waist];

/// One point on a measurement line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Day of the reading
    pub date: NaiveDate,
    /// Reading, absent when the entry skipped this field
    pub value: Option<f64>,
}

/// One measurement line on the progress chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Charted field
    pub field: MeasurementField,
    /// Legend label
    pub label: &'static str,
    /// Line color, fixed per field
    pub color: &'static str,
    /// Points in history order
    pub points: Vec<ChartPoint>,
}

/// Line color of `field`; the same field always gets the same color
#[must_use]
pub const fn series_color(field: MeasurementField) -> &'static str {
    SERIES_PALETTE[field.ordinal() % SERIES_PALETTE.len()]
}

/// Chart series for `fields` over the history inside `range` as seen on `today`
///
/// Series follow the order of `fields`; a field listed twice is charted once.
#[must_use]
pub fn chart_series(
    document: &MeasurementsDocument,
    fields: &[MeasurementField],
    range: TimeRange,
    today: NaiveDate,
) -> Vec<ChartSeries> {
    let entries = document.filter_history(range, today);

    let mut series: Vec<ChartSeries> = Vec::with_capacity(fields.len());
    for &field in fields {
        if series.iter().any(|existing| existing.field == field) {
            continue;
        }
        series.push(ChartSeries {
            field,
            label: field.label(),
            color: series_color(field),
            points: entries
                .iter()
                .map(|entry| ChartPoint {
                    date: entry.date,
                    value: entry.values.get(field),
                })
                .collect(),
        });
    }
    series
}
