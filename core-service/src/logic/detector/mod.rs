//! Detector Module - Detection Service
//!
//! Owns the current fitted forest and the model store.
//!
//! # Lifecycle
//! Uninitialized → `initialize()` loads the stored artifact, or bootstraps
//! from the seed dataset when it is missing or unusable → each `retrain()`
//! replaces the forest wholesale.
//!
//! # Concurrency
//! `detect` clones an `Arc` of the current model and scores without holding
//! any lock. `retrain` fits outside every lock, then saves and swaps under
//! the commit mutex so disk and memory always agree.

pub mod seed;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{DetectorError, DetectorResult, StoreError};
use crate::logic::config::DetectorConfig;
use crate::logic::features::{build, FeatureVector, Reading, FEATURE_LAYOUT};
use crate::logic::model::IsolationForest;
use crate::logic::store::{ModelArtifact, ModelStore};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Per-reading detection output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_anomaly: bool,
    /// [0, 1], higher = more anomalous
    pub anomaly_score: f64,
}

/// Where the current model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    Loaded,
    Bootstrapped,
    Retrained,
}

/// The model currently being served
#[derive(Debug)]
pub struct ActiveModel {
    pub artifact: ModelArtifact,
    pub source: ModelSource,
}

impl ActiveModel {
    pub fn forest(&self) -> &IsolationForest {
        &self.artifact.forest
    }
}

/// Status snapshot for the transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub source: Option<ModelSource>,
    pub model_id: Option<Uuid>,
    pub trained_at: Option<DateTime<Utc>>,
    pub num_trees: usize,
    pub subsample_size: usize,
    pub training_size: usize,
    pub contamination: f64,
    pub threshold: Option<f64>,
    pub feature_names: Vec<String>,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct DetectionService {
    config: DetectorConfig,
    store: ModelStore,
    current: RwLock<Option<Arc<ActiveModel>>>,
    commit: Mutex<()>,
}

impl DetectionService {
    /// Uninitialized service storing its model at `config.model_path`
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        let store = ModelStore::new(config.model_path.clone());
        Self::with_store(config, store)
    }

    pub fn with_store(config: DetectorConfig, store: ModelStore) -> DetectorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            current: RwLock::new(None),
            commit: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Load the stored model, falling back to bootstrap training.
    /// A bad artifact on disk is never fatal.
    pub fn initialize(&self) -> DetectorResult<()> {
        match self.store.load() {
            Ok(artifact) => {
                log::info!(
                    "Loaded model {} ({} trees, trained {}) from {:?}",
                    artifact.model_id,
                    artifact.forest.num_trees(),
                    artifact.trained_at.format("%Y-%m-%d %H:%M:%S"),
                    self.store.path()
                );
                self.swap(artifact, ModelSource::Loaded);
                return Ok(());
            }
            Err(StoreError::NotFound(path)) => {
                log::info!("No model found at {:?}", path);
            }
            Err(e) => {
                log::warn!("Stored model unusable ({}). Retraining from seed data.", e);
            }
        }

        if !self.config.bootstrap {
            log::warn!("Bootstrap disabled; detector stays untrained until /train is called");
            return Ok(());
        }

        self.bootstrap()
    }

    /// Fit the seed dataset and serve it
    fn bootstrap(&self) -> DetectorResult<()> {
        let vectors: Vec<FeatureVector> = seed::seed_readings().iter().map(build).collect();
        let forest = IsolationForest::fit(&vectors, &self.config.forest_params(), &mut self.rng())?;
        let artifact = ModelArtifact::new(forest);

        let _guard = self.commit.lock();
        if let Err(e) = self.store.save(&artifact) {
            log::error!("Failed to save bootstrap model: {}", e);
        }
        log::info!("Bootstrap model {} trained on {} seed readings", artifact.model_id, vectors.len());
        self.swap(artifact, ModelSource::Bootstrapped);

        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn swap(&self, artifact: ModelArtifact, source: ModelSource) {
        let model = Arc::new(ActiveModel { artifact, source });
        *self.current.write() = Some(model);
    }

    /// Model being served right now, if any
    pub fn current_model(&self) -> Option<Arc<ActiveModel>> {
        self.current.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    // ------------------------------------------------------------------------
    // Detect
    // ------------------------------------------------------------------------

    pub fn detect(&self, reading: &Reading) -> DetectorResult<DetectionResult> {
        let model = self
            .current_model()
            .ok_or_else(|| DetectorError::ModelState("detector has not been trained".into()))?;

        let vector = build(reading);
        let forest = model.forest();
        let score = forest.score(vector.as_slice())?;
        let is_anomaly = forest.is_anomaly(score);

        if is_anomaly {
            log::debug!("Anomaly (score {:.4}): {}", score, vector.to_log_entry());
        }

        Ok(DetectionResult {
            is_anomaly,
            anomaly_score: score,
        })
    }

    /// Detect on a raw JSON payload
    pub fn detect_json(&self, payload: &Value) -> DetectorResult<DetectionResult> {
        let reading = Reading::from_json(payload)
            .map_err(|e| DetectorError::InvalidInput(e.to_string()))?;
        self.detect(&reading)
    }

    // ------------------------------------------------------------------------
    // Retrain
    // ------------------------------------------------------------------------

    /// Fit a new forest on `readings`, persist it, and swap it in.
    /// On any error the current model keeps serving.
    pub fn retrain(&self, readings: &[Reading]) -> DetectorResult<ModelInfo> {
        if readings.is_empty() {
            return Err(DetectorError::InvalidTrainingData("training batch is empty".into()));
        }

        let vectors: Vec<FeatureVector> = readings.iter().map(build).collect();
        let forest = IsolationForest::fit(&vectors, &self.config.forest_params(), &mut self.rng())?;
        let artifact = ModelArtifact::new(forest);

        {
            let _guard = self.commit.lock();
            self.store.save(&artifact)?;
            log::info!(
                "Retrained model {} on {} readings (threshold {:.4})",
                artifact.model_id,
                vectors.len(),
                artifact.forest.threshold()
            );
            self.swap(artifact, ModelSource::Retrained);
        }

        Ok(self.status())
    }

    /// Retrain on a raw JSON payload (array of reading objects)
    pub fn retrain_json(&self, payload: &Value) -> DetectorResult<ModelInfo> {
        let records = payload.as_array().ok_or_else(|| {
            DetectorError::InvalidTrainingData("expected a JSON array of readings".into())
        })?;

        let readings = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                Reading::from_json(record)
                    .map_err(|e| DetectorError::InvalidTrainingData(format!("record {}: {}", i, e)))
            })
            .collect::<DetectorResult<Vec<Reading>>>()?;

        self.retrain(&readings)
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    pub fn status(&self) -> ModelInfo {
        let feature_names = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();

        match self.current_model() {
            Some(model) => {
                let forest = model.forest();
                ModelInfo {
                    loaded: true,
                    source: Some(model.source),
                    model_id: Some(model.artifact.model_id),
                    trained_at: Some(model.artifact.trained_at),
                    num_trees: forest.num_trees(),
                    subsample_size: forest.mean_psi().round() as usize,
                    training_size: forest.training_size(),
                    contamination: forest.contamination(),
                    threshold: Some(forest.threshold()),
                    feature_names,
                }
            }
            None => ModelInfo {
                loaded: false,
                source: None,
                model_id: None,
                trained_at: None,
                num_trees: 0,
                subsample_size: 0,
                training_size: 0,
                contamination: self.config.contamination,
                threshold: None,
                feature_names,
            },
        }
    }
}
