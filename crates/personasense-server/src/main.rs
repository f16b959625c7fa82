//! PersonaSense Server Binary
//!
//! Standalone server for the PersonaSense prediction API.

use std::sync::Arc;

use personasense_core::ServiceConfig;
use personasense_server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config));

    serve(&config.addr, state).await
}
