//! Service configuration
//!
//! Defaults match the reference deployment; a TOML file (pointed at by
//! `PERSONASENSE_CONFIG`) and individual environment variables can
//! override them. Environment variables win over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Service-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address for the HTTP server.
    pub addr: String,
    /// Path to the serialized pipeline artifact.
    pub pipeline_path: PathBuf,
    /// Path to the serialized label encoder artifact.
    pub encoder_path: PathBuf,
    /// Directory for per-request audit files, created on demand.
    pub predictions_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            pipeline_path: PathBuf::from("artifacts/pipeline.json"),
            encoder_path: PathBuf::from("artifacts/label_encoder.json"),
            predictions_dir: PathBuf::from("predictions"),
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Resolve configuration from the environment.
    ///
    /// Reads the file named by `PERSONASENSE_CONFIG` if set, then applies
    /// `PERSONASENSE_ADDR`, `PERSONASENSE_PIPELINE`, `PERSONASENSE_ENCODER`
    /// and `PERSONASENSE_PREDICTIONS_DIR` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os("PERSONASENSE_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var("PERSONASENSE_ADDR") {
            config.addr = addr;
        }
        if let Ok(path) = std::env::var("PERSONASENSE_PIPELINE") {
            config.pipeline_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PERSONASENSE_ENCODER") {
            config.encoder_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("PERSONASENSE_PREDICTIONS_DIR") {
            config.predictions_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}
