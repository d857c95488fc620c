//! Feature Vector - Core data structure for forest input
//!
//! A `Reading` is the loosely-typed sensor payload; `build` turns it into a
//! fixed-order `FeatureVector` using the default table from `layout.rs`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_DEFAULTS, FEATURE_LAYOUT};

// ============================================================================
// READING
// ============================================================================

/// Sensor reading: recognized feature name → value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    values: BTreeMap<String, f64>,
}

/// Why a JSON payload could not become a `Reading`
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingError {
    NotAnObject,
    Empty,
    NonNumeric { field: String },
}

impl std::fmt::Display for ReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingError::NotAnObject => write!(f, "reading must be a JSON object"),
            ReadingError::Empty => write!(f, "reading has no fields"),
            ReadingError::NonNumeric { field } => write!(f, "field '{}' must be a number", field),
        }
    }
}

impl std::error::Error for ReadingError {}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, ignoring names outside the layout
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns false for unrecognized names
    pub fn insert(&mut self, name: &str, value: f64) -> bool {
        if feature_index(name).is_some() {
            self.values.insert(name.to_string(), value);
            true
        } else {
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of recognized fields present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a JSON payload.
    ///
    /// Unrecognized keys are skipped whatever their type. `null` on a
    /// recognized key counts as missing. Any other non-number on a
    /// recognized key is an error.
    pub fn from_json(value: &Value) -> Result<Self, ReadingError> {
        let object = value.as_object().ok_or(ReadingError::NotAnObject)?;
        if object.is_empty() {
            return Err(ReadingError::Empty);
        }

        let mut reading = Reading::new();
        for (key, raw) in object {
            if feature_index(key).is_none() || raw.is_null() {
                continue;
            }
            let number = raw.as_f64().ok_or_else(|| ReadingError::NonNumeric {
                field: key.clone(),
            })?;
            reading.insert(key, number);
        }

        Ok(reading)
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Fixed-order numeric encoding of a reading (order = FEATURE_LAYOUT)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    pub fn to_log_entry(&self) -> Value {
        let named: serde_json::Map<String, Value> = FEATURE_LAYOUT
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.to_string(), Value::from(*value)))
            .collect();
        Value::Object(named)
    }
}

impl Default for FeatureVector {
    /// The default table itself
    fn default() -> Self {
        Self::from_values(FEATURE_DEFAULTS)
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<&Reading> for FeatureVector {
    fn from(reading: &Reading) -> Self {
        build(reading)
    }
}

/// Build the feature vector for a reading. Never fails.
pub fn build(reading: &Reading) -> FeatureVector {
    let mut values = FEATURE_DEFAULTS;
    for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
        if let Some(v) = reading.get(name) {
            *slot = v;
        }
    }
    FeatureVector::from_values(values)
}
