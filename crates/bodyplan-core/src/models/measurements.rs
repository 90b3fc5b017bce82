// ABOUTME: Body measurement document with current values, goals, and dated history
// ABOUTME: Recording, deleting, and time-range filtering of history entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use super::lenient::number_from_value;
use crate::errors::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracked body measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementField {
    /// Hip circumference
    Hips,
    /// High hip circumference
    HighHips,
    /// Waist circumference
    Waist,
    /// Bust circumference
    Bust,
    /// Thigh circumference
    Thighs,
    /// Inner thigh circumference
    InnerThighs,
}

impl MeasurementField {
    /// Every field, in display order
    pub const ALL: [Self; 6] = [
        Self::Hips,
        Self::HighHips,
        Self::Waist,
        Self::Bust,
        Self::Thighs,
        Self::InnerThighs,
    ];

    /// Document key
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hips => "hips",
            Self::HighHips => "highHips",
            Self::Waist => "waist",
            Self::Bust => "bust",
            Self::Thighs => "thighs",
            Self::InnerThighs => "innerThighs",
        }
    }

    /// Form and chart label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hips => "Hips (cm)",
            Self::HighHips => "High Hips (cm)",
            Self::Waist => "Waist (cm)",
            Self::Bust => "Bust (cm)",
            Self::Thighs => "Thighs (cm)",
            Self::InnerThighs => "Inner Thighs (cm)",
        }
    }

    /// Position in [`MeasurementField::ALL`]
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One optional reading per measurement field
///
/// Stored as `{field: number | ""}` for current values and goals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementValues {
    values: BTreeMap<MeasurementField, f64>,
}

impl MeasurementValues {
    /// Reading for `field`, if entered
    #[must_use]
    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        self.values.get(&field).copied()
    }

    /// Set or clear the reading for `field`; non-finite numbers clear it
    pub fn set(&mut self, field: MeasurementField, value: Option<f64>) {
        match value.filter(|number| number.is_finite()) {
            Some(number) => {
                self.values.insert(field, number);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Builder form of [`MeasurementValues::set`]
    #[must_use]
    pub fn with(mut self, field: MeasurementField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Whether at least one field has a reading
    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.values.is_empty()
    }

    /// Entered readings in field order
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, f64)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut values = Self::default();
        for field in MeasurementField::ALL {
            values.set(field, object.get(field.key()).and_then(number_from_value));
        }
        values
    }
}

impl Serialize for MeasurementValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(MeasurementField::ALL.len()))?;
        for field in MeasurementField::ALL {
            match self.get(field) {
                Some(value) => map.serialize_entry(field.key(), &value)?,
                None => map.serialize_entry(field.key(), "")?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MeasurementValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(Self::from_object(&object)),
            Value::Null => Ok(Self::default()),
            other => Err(D::Error::custom(format!(
                "expected measurement values, found {other}"
            ))),
        }
    }
}

/// Dated snapshot of the current values
///
/// Stored as `{date: "YYYY-MM-DD", field: number | null, …}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementEntry {
    /// Day the readings were taken
    pub date: NaiveDate,
    /// Readings taken that day
    pub values: MeasurementValues,
}

impl Serialize for MeasurementEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(MeasurementField::ALL.len() + 1))?;
        map.serialize_entry("date", &self.date.format(DATE_FORMAT).to_string())?;
        for field in MeasurementField::ALL {
            map.serialize_entry(field.key(), &self.values.get(field))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MeasurementEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        let date = object
            .get("date")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("date"))?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(D::Error::custom)?;
        Ok(Self {
            date,
            values: MeasurementValues::from_object(&object),
        })
    }
}

/// Window of history shown on the progress chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Entire history
    #[default]
    #[serde(rename = "all")]
    All,
    /// Last seven days
    #[serde(rename = "week")]
    Week,
    /// Last month
    #[serde(rename = "month")]
    Month,
    /// Last three months
    #[serde(rename = "3months")]
    ThreeMonths,
    /// Last six months
    #[serde(rename = "6months")]
    SixMonths,
    /// Last year
    #[serde(rename = "year")]
    Year,
}

impl TimeRange {
    /// Earliest date kept when viewing on `today`; `None` keeps everything
    ///
    /// Month arithmetic clamps to the last day of shorter months.
    #[must_use]
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Self::SixMonths => today.checked_sub_months(Months::new(6)),
            Self::Year => today.checked_sub_months(Months::new(12)),
        }
    }
}

/// Per-user measurements document
///
/// Stored history items that cannot be read (for example an unparseable date) are kept
/// aside in `unreadable_history` and written back after the readable entries, so a save
/// never drops them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementsDocument {
    /// Values currently entered in the form
    pub current: MeasurementValues,
    /// Target values
    pub goals: MeasurementValues,
    /// Recorded snapshots, oldest first
    pub history: Vec<MeasurementEntry>,
    /// Stored history items that could not be read, as found
    pub unreadable_history: Vec<Value>,
}

struct StoredHistory<'a> {
    entries: &'a [MeasurementEntry],
    unreadable: &'a [Value],
}

impl Serialize for StoredHistory<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len() + self.unreadable.len()))?;
        for entry in self.entries {
            seq.serialize_element(entry)?;
        }
        for item in self.unreadable {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for MeasurementsDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("current", &self.current)?;
        map.serialize_entry("goals", &self.goals)?;
        map.serialize_entry(
            "history",
            &StoredHistory {
                entries: &self.history,
                unreadable: &self.unreadable_history,
            },
        )?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for MeasurementsDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Stored {
            #[serde(default)]
            current: MeasurementValues,
            #[serde(default)]
            goals: MeasurementValues,
            #[serde(default)]
            history: Value,
        }

        let stored = Stored::deserialize(deserializer)?;
        let mut history = Vec::new();
        let mut unreadable_history = Vec::new();
        match stored.history {
            Value::Array(items) => {
                for item in items {
                    match serde_json::from_value::<MeasurementEntry>(item.clone()) {
                        Ok(entry) => history.push(entry),
                        Err(e) => {
                            warn!(error = %e, "Keeping unreadable measurement entry as stored");
                            unreadable_history.push(item);
                        }
                    }
                }
            }
            Value::Null => {}
            other => warn!(found = %other, "Measurement history is not a list, treating as empty"),
        }

        Ok(Self {
            current: stored.current,
            goals: stored.goals,
            history,
            unreadable_history,
        })
    }
}

impl MeasurementsDocument {
    /// Append a snapshot of the current values dated `date`
    ///
    /// # Errors
    ///
    /// Returns a validation error when no current value has been entered
    pub fn record_entry(&mut self, date: NaiveDate) -> AppResult<MeasurementEntry> {
        if !self.current.has_any() {
            return Err(AppError::invalid_input(
                "Please enter at least one measurement",
            ));
        }

        let entry = MeasurementEntry {
            date,
            values: self.current.clone(),
        };
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Remove every history entry equal to `entry`; returns how many were removed
    pub fn remove_entry(&mut self, entry: &MeasurementEntry) -> usize {
        let before = self.history.len();
        self.history.retain(|existing| existing != entry);
        before - self.history.len()
    }

    /// History entries inside `range` as seen on `today`, oldest first
    #[must_use]
    pub fn filter_history(&self, range: TimeRange, today: NaiveDate) -> Vec<&MeasurementEntry> {
        let cutoff = range.cutoff(today);
        self.history
            .iter()
            .filter(|entry| cutoff.is_none_or(|cutoff| entry.date >= cutoff))
            .collect()
    }
}
