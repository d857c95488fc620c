//! Retraining handler

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use aquaguard_core::ModelInfo;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub model: ModelInfo,
}

/// POST /train
///
/// Body is a JSON array of readings. Fitting runs on the blocking pool so
/// detection requests keep being served by the previous model meanwhile.
pub async fn train(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<TrainResponse>> {
    let detector = state.detector.clone();

    let model = tokio::task::spawn_blocking(move || detector.retrain_json(&payload))
        .await
        .map_err(|e| AppError::InternalError(format!("Training task failed: {}", e)))??;

    tracing::info!(
        training_size = model.training_size,
        threshold = ?model.threshold,
        "Model retrained"
    );

    Ok(Json(TrainResponse {
        message: "Model retrained successfully",
        model,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::ready_state;
    use aquaguard_core::ModelSource;
    use serde_json::json;

    fn batch() -> Value {
        let records: Vec<Value> = (0..40)
            .map(|i| {
                let d = (i % 7) as f64 * 0.03;
                json!({
                    "ph": 7.1 + d, "dissolved_oxygen": 8.4 + d, "temperature": 21.5 + d,
                    "turbidity": 2.0 + d, "conductivity": 445.0 + d * 10.0
                })
            })
            .collect();
        Value::Array(records)
    }

    #[tokio::test]
    async fn test_train_replaces_model() {
        let (_dir, state) = ready_state();
        let before = state.detector.status().model_id;

        let Json(response) = train(State(state.clone()), Json(batch())).await.unwrap();
        assert_eq!(response.message, "Model retrained successfully");
        assert_eq!(response.model.training_size, 40);
        assert_eq!(response.model.source, Some(ModelSource::Retrained));
        assert_ne!(response.model.model_id, before);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["message"], "Model retrained successfully");
        assert_eq!(body["training_size"], 40);
    }

    #[tokio::test]
    async fn test_train_rejects_empty_batch() {
        let (_dir, state) = ready_state();
        let before = state.detector.status().model_id;

        let result = train(State(state.clone()), Json(json!([]))).await;
        assert!(matches!(result, Err(AppError::InvalidTrainingData(_))));
        assert_eq!(state.detector.status().model_id, before);
    }

    #[tokio::test]
    async fn test_train_rejects_object_body() {
        let (_dir, state) = ready_state();
        let result = train(State(state), Json(json!({ "ph": 7.0 }))).await;
        assert!(matches!(result, Err(AppError::InvalidTrainingData(_))));
    }
}
