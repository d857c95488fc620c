//! Logic Module - Detection Engines
//!
//! ## Layout
//! - `features/` - Reading parsing, feature layout, vector builder
//! - `model/` - Isolation forest (trees, scoring, threshold calibration)
//! - `store/` - Versioned model artifact persistence
//! - `detector/` - Detection service (current forest, bootstrap, retrain)

pub mod config;
pub mod features;
pub mod model;
pub mod store;
pub mod detector;
