//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use aquaguard_core::DetectorError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    InvalidInput(String),
    InvalidTrainingData(String),

    // Detector has no usable model
    ModelUnavailable(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::InvalidTrainingData(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ModelUnavailable(msg) => {
                tracing::warn!("Model unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Anomaly model is not available")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<DetectorError> for AppError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::InvalidInput(msg) => AppError::InvalidInput(msg),
            DetectorError::InvalidTrainingData(msg) => AppError::InvalidTrainingData(msg),
            DetectorError::ModelState(msg) => AppError::ModelUnavailable(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaguard_core::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DetectorError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (DetectorError::InvalidTrainingData("x".into()), StatusCode::BAD_REQUEST),
            (DetectorError::ModelState("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                DetectorError::Store(StoreError::Corruption("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
