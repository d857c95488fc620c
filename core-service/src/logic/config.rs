//! Detector Configuration
//!
//! Training parameters and artifact location for the detection service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTAMINATION, DEFAULT_MODEL_PATH, DEFAULT_NUM_TREES, DEFAULT_SEED,
    DEFAULT_SUBSAMPLE_SIZE,
};
use crate::error::DetectorResult;
use crate::logic::model::ForestParams;

/// Detection service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Model artifact path
    pub model_path: PathBuf,

    /// Number of isolation trees
    pub num_trees: usize,

    /// Points drawn per tree (capped at training set size)
    pub subsample_size: usize,

    /// Expected anomaly fraction, in (0, 0.5]
    pub contamination: f64,

    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Fit the seed dataset when no usable artifact exists
    pub bootstrap: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            num_trees: DEFAULT_NUM_TREES,
            subsample_size: DEFAULT_SUBSAMPLE_SIZE,
            contamination: DEFAULT_CONTAMINATION,
            seed: Some(DEFAULT_SEED),
            bootstrap: true,
        }
    }
}

impl DetectorConfig {
    pub fn with_model_path(path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: path.into(),
            ..Default::default()
        }
    }

    /// Reject parameters the forest cannot be fit with
    pub fn validate(&self) -> DetectorResult<()> {
        self.forest_params().validate()
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            num_trees: self.num_trees,
            subsample_size: self.subsample_size,
            contamination: self.contamination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectorError;

    #[test]
    fn test_defaults_match_service_bootstrap() {
        let config = DetectorConfig::default();
        assert_eq!(config.num_trees, 100);
        assert_eq!(config.subsample_size, 256);
        assert_eq!(config.contamination, 0.02);
        assert_eq!(config.seed, Some(42));
        assert!(config.bootstrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reject_bad_contamination() {
        for bad in [0.0, -0.1, 0.51, f64::NAN] {
            let config = DetectorConfig {
                contamination: bad,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(DetectorError::InvalidConfig(_))), "{}", bad);
        }
    }

    #[test]
    fn test_reject_zero_trees_and_subsample() {
        let config = DetectorConfig { num_trees: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = DetectorConfig { subsample_size: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: DetectorConfig = serde_json::from_str(r#"{"num_trees": 10}"#).unwrap();
        assert_eq!(config.num_trees, 10);
        assert_eq!(config.contamination, DEFAULT_CONTAMINATION);
    }
}
