//! Model status handler

use axum::{extract::State, Json};

use aquaguard_core::ModelInfo;

use crate::AppState;

/// GET /model/status
pub async fn status(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.detector.status())
}
