//! Anomaly detection handler

use axum::{extract::State, Json};
use serde_json::Value;

use aquaguard_core::DetectionResult;

use crate::{AppResult, AppState};

/// POST /predict
///
/// Body is a JSON object of sensor fields. Missing fields fall back to
/// neutral defaults; unknown fields are ignored.
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<DetectionResult>> {
    let result = state.detector.detect_json(&payload)?;

    if result.is_anomaly {
        tracing::info!(score = result.anomaly_score, "Anomalous reading detected");
    } else {
        tracing::debug!(score = result.anomaly_score, "Reading scored");
    }

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{ready_state, state_with};
    use crate::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_predict_normal_reading() {
        let (_dir, state) = ready_state();
        let payload = json!({
            "ph": 7.2, "dissolved_oxygen": 8.5, "temperature": 22.0,
            "turbidity": 2.1, "conductivity": 450.0
        });

        let Json(result) = predict(State(state), Json(payload)).await.unwrap();
        assert!(!result.is_anomaly);
        assert!((0.0..=1.0).contains(&result.anomaly_score));
    }

    #[tokio::test]
    async fn test_predict_rejects_non_object() {
        let (_dir, state) = ready_state();
        let result = predict(State(state), Json(json!([7.2, 8.5]))).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_predict_without_model() {
        let (_dir, state) = state_with(false);
        let result = predict(State(state), Json(json!({ "ph": 7.0 }))).await;
        assert!(matches!(result, Err(AppError::ModelUnavailable(_))));
    }
}
