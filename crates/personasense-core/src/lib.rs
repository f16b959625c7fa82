//! PersonaSense Core
//!
//! Library for personality-type prediction: raw survey record types,
//! the behavioral feature deriver, pipeline/label-encoder artifact
//! loading, audit output, and service configuration.
//!
//! The HTTP surface lives in `personasense-server`; this crate is pure
//! synchronous library code.

pub mod artifact;
pub mod audit;
pub mod config;
pub mod error;
pub mod features;
pub mod record;

pub use artifact::{LabelEncoder, ModelSpec, Pipeline, PipelineArtifact};
pub use audit::AuditWriter;
pub use config::ServiceConfig;
pub use error::{ArtifactError, AuditError, ConfigError, PersonaError, PredictError, Result};
pub use features::derive;
pub use record::{ActivityLevel, Categorical, DerivedRecord, NetworkCategory, RawRecord};
