use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::types::ModelArtifact;
use super::validate::validate_artifact;
use crate::error::StoreError;

/// File-backed model store holding a single artifact
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Sibling temp file, unique per save so concurrent writers never share one
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "model".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }

    /// Write the artifact, replacing any previous one atomically
    pub fn save(&self, artifact: &ModelArtifact) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(artifact).map_err(StoreError::Serialize)?;

        // Write to temp, then rename over the target
        let tmp_path = self.temp_path();
        let result = fs::write(&tmp_path, json).and_then(|_| fs::rename(&tmp_path, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(e));
        }

        log::info!(
            "Saved model {} ({} trees) to {:?}",
            artifact.model_id,
            artifact.forest.num_trees(),
            self.path
        );
        Ok(())
    }

    /// Load and validate the stored artifact
    pub fn load(&self) -> Result<ModelArtifact, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let artifact: ModelArtifact = serde_json::from_slice(&data)
            .map_err(|e| StoreError::Corruption(format!("unreadable artifact: {}", e)))?;

        validate_artifact(&artifact)?;

        log::debug!("Loaded model {} from {:?}", artifact.model_id, self.path);
        Ok(artifact)
    }
}
