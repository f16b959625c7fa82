//! Error types for personasense-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for personasense operations
pub type Result<T> = std::result::Result<T, PersonaError>;

/// Main error type for personasense operations
#[derive(Error, Debug)]
pub enum PersonaError {
    /// Artifact loading/validation errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Prediction-time errors
    #[error("Prediction error: {0}")]
    Predict(#[from] PredictError),

    /// Audit output errors
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors loading or validating the persisted pipeline and label encoder
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("Failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for the expected shape
    #[error("Malformed artifact {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Artifact was produced for a different format version
    #[error("Unsupported artifact version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    /// Pipeline declares a column the feature deriver does not produce
    #[error("Pipeline artifact references unknown feature column {0:?}")]
    UnknownFeature(String),

    /// Pipeline declares no feature columns at all
    #[error("Pipeline artifact declares no feature columns")]
    EmptyFeatures,

    /// Model parameter shapes disagree with the declared columns/classes
    #[error("Inconsistent model dimensions: {0}")]
    Dimensions(String),

    /// Label encoder declares no classes
    #[error("Label encoder declares no classes")]
    EmptyClasses,
}

/// Errors raised while computing a prediction
#[derive(Error, Debug)]
pub enum PredictError {
    /// Derived record lacks a column the pipeline expects
    #[error("Derived record is missing column {0:?}")]
    MissingFeature(String),

    /// Classifier produced a label index outside the encoder's classes
    #[error("Encoded label {index} out of range for {classes} classes")]
    UnknownLabel { index: usize, classes: usize },
}

/// Errors writing audit rows
#[derive(Error, Debug)]
pub enum AuditError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors loading service configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected shape
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
