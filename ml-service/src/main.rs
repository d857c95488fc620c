//! AquaGuard ML Service
//!
//! HTTP front for the water-quality anomaly detector.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AQUAGUARD ML SERVICE                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────────────────────────────────┐ │
//! │  │  API      │  │  DetectionService (aquaguard-core)      │ │
//! │  │  (Axum)   │──▶  isolation forest + model artifact      │ │
//! │  └───────────┘  └────────────────────┬────────────────────┘ │
//! │                                      ▼                      │
//! │                          ┌──────────────────────┐           │
//! │                          │ models/*.json (disk) │           │
//! │                          └──────────────────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aquaguard_core::DetectionService;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "aquaguard_ml=debug,aquaguard_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("AquaGuard ML Service starting...");
    tracing::info!(
        "Model: {} ({} trees, subsample {}, contamination {})",
        config.detector.model_path.display(),
        config.detector.num_trees,
        config.detector.subsample_size,
        config.detector.contamination
    );

    // Load or bootstrap the model before accepting traffic
    let detector = Arc::new(DetectionService::new(config.detector.clone())?);
    {
        let detector = detector.clone();
        tokio::task::spawn_blocking(move || detector.initialize()).await??;
    }

    if detector.is_ready() {
        tracing::info!("Model ready");
    } else {
        tracing::warn!("No model loaded; /predict returns 503 until /train succeeds");
    }

    // Build application state
    let state = AppState { detector };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<DetectionService>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::detect::predict))
        .route("/train", post(handlers::train::train))
        .route("/model/status", get(handlers::model::status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
