//! PersonaSense Server - Prediction API
//!
//! HTTP surface over the prediction pipeline: a banner route, a health
//! probe reporting artifact load state, and the predict endpoint.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use personasense_core::{AuditWriter, LabelEncoder, Pipeline, ServiceConfig};

pub mod http;

/// Shared application state
///
/// Artifacts are loaded once at startup and read-only afterwards, so
/// they are shared across requests without locking. A `None` artifact
/// means its load failed; the service still serves, but every predict
/// request is rejected until a restart with valid artifacts.
pub struct AppState {
    pub pipeline: Option<Pipeline>,
    pub encoder: Option<LabelEncoder>,
    pub audit: AuditWriter,
}

impl AppState {
    /// Load artifacts per the config, degrading (not failing) on error.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let pipeline = match Pipeline::load(&config.pipeline_path) {
            Ok(pipeline) => Some(pipeline),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load pipeline, predictions disabled");
                None
            }
        };
        let encoder = match LabelEncoder::load(&config.encoder_path) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load label encoder, predictions disabled");
                None
            }
        };
        Self {
            pipeline,
            encoder,
            audit: AuditWriter::new(&config.predictions_dir),
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::root))
        .route("/health", get(http::health))
        .route("/predict", post(http::predict))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("PersonaSense server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
