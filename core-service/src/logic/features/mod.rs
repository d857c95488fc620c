//! Features Module - Reading to Feature Vector
//!
//! Single place where the five water-quality fields, their order and their
//! defaults are defined.

pub mod layout;
pub mod vector;


pub use layout::{FEATURE_COUNT, FEATURE_DEFAULTS, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo};
pub use vector::{build, FeatureVector, Reading, ReadingError};
