//! AquaGuard Core - Water Quality Anomaly Detection Engine
//!
//! Unsupervised anomaly detection for multivariate sensor readings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     DETECTION SERVICE                        │
//! │   (current forest: Arc swap, bootstrap, retrain, detect)     │
//! ├───────────────┬───────────────────────┬──────────────────────┤
//! │  features/    │  model/               │  store/              │
//! │  Reading →    │  IsolationForest      │  JSON artifact       │
//! │  FeatureVector│  fit / score          │  atomic save / load  │
//! └───────────────┴───────────────────────┴──────────────────────┘
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{DetectorError, DetectorResult, StoreError};
pub use logic::config::DetectorConfig;
pub use logic::detector::{DetectionResult, DetectionService, ModelInfo, ModelSource};
pub use logic::features::{build, FeatureVector, Reading, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{ForestParams, IsolationForest};
pub use logic::store::ModelStore;
