//! Isolation Forest
//!
//! Ensemble of isolation trees. The score is `2^(-E[h(x)] / c(psi))`:
//! close to 1 means isolated quickly (anomalous), at or below 0.5 means
//! normal. The contamination threshold is calibrated on the training scores
//! at fit time and stored with the forest.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::threshold::{calibrate, ThresholdStats};
use super::tree::{normalization_factor, IsolationTree};
use crate::constants::{
    DEFAULT_CONTAMINATION, DEFAULT_NUM_TREES, DEFAULT_SUBSAMPLE_SIZE, MAX_CONTAMINATION,
};
use crate::error::{DetectorError, DetectorResult};

/// Score reported when c(psi) is zero (single-point training set)
const UNINFORMATIVE_SCORE: f64 = 0.5;

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub num_trees: usize,
    pub subsample_size: usize,
    pub contamination: f64,
}

impl ForestParams {
    pub fn validate(&self) -> DetectorResult<()> {
        if self.num_trees == 0 {
            return Err(DetectorError::InvalidConfig("num_trees must be at least 1".into()));
        }
        if self.subsample_size == 0 {
            return Err(DetectorError::InvalidConfig("subsample_size must be at least 1".into()));
        }
        if !(self.contamination > 0.0 && self.contamination <= MAX_CONTAMINATION) {
            return Err(DetectorError::InvalidConfig(format!(
                "contamination must be in (0, {}], got {}",
                MAX_CONTAMINATION, self.contamination
            )));
        }
        Ok(())
    }
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            num_trees: DEFAULT_NUM_TREES,
            subsample_size: DEFAULT_SUBSAMPLE_SIZE,
            contamination: DEFAULT_CONTAMINATION,
        }
    }
}

/// Fitted isolation forest. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    /// Dimensionality of the vectors the forest was fit on
    num_features: usize,
    /// Number of vectors in the training set
    training_size: usize,
    contamination: f64,
    /// Scores strictly above this are anomalies
    threshold: f64,
}

impl IsolationForest {
    /// Fit a forest. All randomness comes from `rng`.
    pub fn fit<V, R>(data: &[V], params: &ForestParams, rng: &mut R) -> DetectorResult<Self>
    where
        V: AsRef<[f64]>,
        R: Rng + ?Sized,
    {
        params.validate()?;

        let rows: Vec<&[f64]> = data.iter().map(|v| v.as_ref()).collect();
        let num_features = Self::check_training_rows(&rows)?;

        let n = rows.len();
        let psi = params.subsample_size.min(n);

        let trees = (0..params.num_trees)
            .map(|_| {
                // Without replacement: duplicates would bias the partitioning
                let indices = rand::seq::index::sample(rng, n, psi).into_vec();
                IsolationTree::grow(&rows, indices, num_features, rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            num_features,
            training_size: n,
            contamination: params.contamination,
            threshold: 0.0,
        };

        let scores = rows
            .iter()
            .map(|row| forest.score(row))
            .collect::<DetectorResult<Vec<f64>>>()?;

        forest.threshold = calibrate(&scores, params.contamination).ok_or_else(|| {
            DetectorError::ModelState("could not calibrate threshold from training scores".into())
        })?;

        let stats = ThresholdStats::from_scores(&scores, forest.threshold, forest.contamination);
        log::debug!(
            "Fitted isolation forest: {} trees, psi {}, n {}, threshold {:.4} ({} of {} training points above)",
            forest.trees.len(),
            psi,
            n,
            stats.threshold,
            stats.flagged,
            stats.sample_count
        );

        Ok(forest)
    }

    fn check_training_rows(rows: &[&[f64]]) -> DetectorResult<usize> {
        let first = rows
            .first()
            .ok_or_else(|| DetectorError::InvalidTrainingData("training set is empty".into()))?;

        let num_features = first.len();
        if num_features == 0 {
            return Err(DetectorError::InvalidTrainingData("training vectors have no features".into()));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_features {
                return Err(DetectorError::InvalidTrainingData(format!(
                    "record {} has {} features, expected {}",
                    i,
                    row.len(),
                    num_features
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(DetectorError::InvalidTrainingData(format!(
                    "record {} contains a non-finite value",
                    i
                )));
            }
        }

        // Split thresholds are drawn from [min, max); the span must be representable
        for feature in 0..num_features {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row[feature]), hi.max(row[feature]))
            });
            if !(hi - lo).is_finite() {
                return Err(DetectorError::InvalidTrainingData(format!(
                    "feature {} spans [{}, {}], too wide to split",
                    feature, lo, hi
                )));
            }
        }

        Ok(num_features)
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    /// Average path length of `sample` across all trees
    pub fn average_path_length(&self, sample: &[f64]) -> DetectorResult<f64> {
        if self.trees.is_empty() {
            return Err(DetectorError::ModelState("forest has no trees".into()));
        }
        if sample.len() != self.num_features {
            return Err(DetectorError::ModelState(format!(
                "sample has {} features, forest expects {}",
                sample.len(),
                self.num_features
            )));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.path_length(sample).ok_or_else(|| {
                DetectorError::ModelState("tree splits on a feature outside the sample".into())
            })?;
        }

        Ok(total / self.trees.len() as f64)
    }

    /// Anomaly score in [0, 1]; higher is more anomalous
    pub fn score(&self, sample: &[f64]) -> DetectorResult<f64> {
        let avg = self.average_path_length(sample)?;
        let c = normalization_factor(self.mean_psi());

        if c <= 0.0 {
            return Ok(UNINFORMATIVE_SCORE);
        }
        Ok(2f64.powf(-avg / c))
    }

    pub fn is_anomaly(&self, score: f64) -> bool {
        score > self.threshold
    }

    pub fn predict(&self, sample: &[f64]) -> DetectorResult<bool> {
        self.score(sample).map(|s| self.is_anomaly(s))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Mean subsample size across trees
    pub fn mean_psi(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.psi() as f64).sum::<f64>() / self.trees.len() as f64
    }

    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn training_size(&self) -> usize {
        self.training_size
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Structural check used when loading persisted forests
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        if self.num_features == 0 {
            return Err("forest has zero features".into());
        }
        if self.training_size == 0 {
            return Err("forest records an empty training set".into());
        }
        if !(self.contamination > 0.0 && self.contamination <= MAX_CONTAMINATION) {
            return Err(format!("contamination {} out of range", self.contamination));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} outside [0, 1]", self.threshold));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            if tree.psi() > self.training_size {
                return Err(format!(
                    "tree {}: psi {} exceeds training size {}",
                    i,
                    tree.psi(),
                    self.training_size
                ));
            }
            tree.validate(self.num_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }

        Ok(())
    }
}
