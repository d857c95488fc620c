use super::types::ModelArtifact;
use crate::constants::{MODEL_FORMAT, MODEL_FORMAT_VERSION};
use crate::error::StoreError;
use crate::logic::features::{LayoutInfo, FEATURE_COUNT};

/// Reject artifacts that would load into a usable-but-wrong model
pub fn validate_artifact(artifact: &ModelArtifact) -> Result<(), StoreError> {
    if artifact.format != MODEL_FORMAT {
        return Err(StoreError::Corruption(format!(
            "unknown artifact format '{}'",
            artifact.format
        )));
    }

    if artifact.format_version != MODEL_FORMAT_VERSION {
        return Err(StoreError::Corruption(format!(
            "artifact format v{}, expected v{}",
            artifact.format_version, MODEL_FORMAT_VERSION
        )));
    }

    if !artifact.layout.is_current() {
        let current = LayoutInfo::current();
        return Err(StoreError::Corruption(format!(
            "feature layout mismatch: expected v{} ({:08x}), got v{} ({:08x}) {:?}",
            current.version,
            current.hash,
            artifact.layout.version,
            artifact.layout.hash,
            artifact.layout.feature_names
        )));
    }

    if artifact.forest.num_features() != FEATURE_COUNT {
        return Err(StoreError::Corruption(format!(
            "forest expects {} features, layout has {}",
            artifact.forest.num_features(),
            FEATURE_COUNT
        )));
    }

    artifact.forest.validate().map_err(StoreError::Corruption)
}
