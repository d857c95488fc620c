//! Feature Layout
//!
//! Names, order and fallback values of the water-quality fields. Split
//! dimensions stored in a trained forest are indices into this table, so
//! any change to it (new field, dropped field, reordering) bumps
//! FEATURE_VERSION and invalidates persisted models.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "ph",                // 0: acidity (pH units)
    "dissolved_oxygen",  // 1: mg/L
    "temperature",       // 2: °C
    "turbidity",         // 3: NTU
    "conductivity",      // 4: µS/cm
];

/// Length of FEATURE_LAYOUT
pub const FEATURE_COUNT: usize = 5;

/// Value substituted for a missing field, indexed like FEATURE_LAYOUT
pub const FEATURE_DEFAULTS: [f64; FEATURE_COUNT] = [7.0, 8.0, 20.0, 5.0, 500.0];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout identity embedded in persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Same version, same hash, same names in the same order
    pub fn is_current(&self) -> bool {
        *self == Self::current()
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

pub fn default_for(name: &str) -> Option<f64> {
    feature_index(name).map(|i| FEATURE_DEFAULTS[i])
}
