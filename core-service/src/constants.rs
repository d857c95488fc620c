//! Central Configuration Constants
//!
//! Single source of truth for all detector defaults.
//! To change a default, only edit this file.

/// Default model artifact location (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "models/anomaly_model.json";

/// Default number of isolation trees
pub const DEFAULT_NUM_TREES: usize = 100;

/// Default subsample size per tree (capped at the training set size)
pub const DEFAULT_SUBSAMPLE_SIZE: usize = 256;

/// Default expected fraction of anomalies in training data
pub const DEFAULT_CONTAMINATION: f64 = 0.02;

/// Default RNG seed for reproducible training
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound accepted for contamination
pub const MAX_CONTAMINATION: f64 = 0.5;

/// Artifact format tag
pub const MODEL_FORMAT: &str = "aquaguard-isolation-forest";

/// Artifact format version
/// MUST be incremented when the serialized forest changes shape
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
