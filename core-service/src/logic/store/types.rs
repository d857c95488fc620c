use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{APP_VERSION, MODEL_FORMAT, MODEL_FORMAT_VERSION};
use crate::logic::features::LayoutInfo;
use crate::logic::model::IsolationForest;

// ============================================================================
// VERSIONED MODEL ARTIFACT
// ============================================================================

/// On-disk envelope for one fitted forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Always MODEL_FORMAT
    pub format: String,
    pub format_version: u32,

    /// Feature order the forest was trained with
    pub layout: LayoutInfo,

    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    /// Crate version that wrote the artifact (informational)
    #[serde(default)]
    pub engine_version: String,

    pub forest: IsolationForest,
}

impl ModelArtifact {
    /// Wrap a freshly fitted forest with the current layout
    pub fn new(forest: IsolationForest) -> Self {
        Self {
            format: MODEL_FORMAT.to_string(),
            format_version: MODEL_FORMAT_VERSION,
            layout: LayoutInfo::current(),
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            engine_version: APP_VERSION.to_string(),
            forest,
        }
    }
}
