//! Persisted pipeline and label encoder artifacts
//!
//! The classifier is trained offline; this module only loads its
//! persisted form and runs it. Artifacts are versioned JSON documents
//! and the column list they declare is validated against the feature
//! deriver's schema at load time, so schema drift between training and
//! serving fails loudly at startup instead of silently misclassifying.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, PredictError};
use crate::features;
use crate::record::{RawRecord, FEATURE_ORDER};

/// Artifact format version this build understands.
pub const ARTIFACT_VERSION: u32 = 1;

/// On-disk form of the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Format version, gated against [`ARTIFACT_VERSION`] at load.
    pub version: u32,
    /// Columns the model consumes, in model input order. Every name must
    /// appear in the feature deriver's output schema.
    pub feature_names: Vec<String>,
    /// Trained model parameters.
    pub model: ModelSpec,
}

/// Trained model parameters, tagged by model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Standardized multinomial logistic regression. Supports
    /// per-class probability estimates.
    Logistic {
        /// Number of output classes.
        classes: usize,
        /// One coefficient row per class, one entry per feature column.
        coefficients: Vec<Vec<f64>>,
        /// One intercept per class.
        intercepts: Vec<f64>,
        /// Per-column standardization means.
        means: Vec<f64>,
        /// Per-column standardization scales.
        scales: Vec<f64>,
    },
    /// Nearest-centroid classifier. Predicts the class whose centroid is
    /// closest in feature space; exposes no probability estimates.
    Centroid {
        /// One centroid per class, one entry per feature column.
        centroids: Vec<Vec<f64>>,
    },
}

/// A loaded, validated prediction pipeline: the feature deriver composed
/// with a trained classifier. Read-only after load; safe to share across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    artifact: PipelineArtifact,
}

impl Pipeline {
    /// Load and validate a pipeline artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: PipelineArtifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ArtifactError::Malformed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        let pipeline = Self::from_artifact(artifact)?;
        tracing::info!(
            path = %path.display(),
            classes = pipeline.n_classes(),
            "Loaded pipeline artifact"
        );
        Ok(pipeline)
    }

    /// Validate an already-deserialized artifact.
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, ArtifactError> {
        if artifact.version != ARTIFACT_VERSION {
            return Err(ArtifactError::VersionMismatch {
                found: artifact.version,
                expected: ARTIFACT_VERSION,
            });
        }
        if artifact.feature_names.is_empty() {
            return Err(ArtifactError::EmptyFeatures);
        }
        for name in &artifact.feature_names {
            if !FEATURE_ORDER.contains(&name.as_str()) {
                return Err(ArtifactError::UnknownFeature(name.clone()));
            }
        }
        let n_features = artifact.feature_names.len();
        match &artifact.model {
            ModelSpec::Logistic {
                classes,
                coefficients,
                intercepts,
                means,
                scales,
            } => {
                if *classes < 2 {
                    return Err(ArtifactError::Dimensions(format!(
                        "logistic model declares {classes} classes, need at least 2"
                    )));
                }
                if coefficients.len() != *classes || intercepts.len() != *classes {
                    return Err(ArtifactError::Dimensions(format!(
                        "expected {classes} coefficient rows and intercepts, got {} and {}",
                        coefficients.len(),
                        intercepts.len()
                    )));
                }
                if let Some(row) = coefficients.iter().find(|row| row.len() != n_features) {
                    return Err(ArtifactError::Dimensions(format!(
                        "coefficient row has {} entries for {n_features} columns",
                        row.len()
                    )));
                }
                if means.len() != n_features || scales.len() != n_features {
                    return Err(ArtifactError::Dimensions(format!(
                        "expected {n_features} means and scales, got {} and {}",
                        means.len(),
                        scales.len()
                    )));
                }
            }
            ModelSpec::Centroid { centroids } => {
                if centroids.len() < 2 {
                    return Err(ArtifactError::Dimensions(format!(
                        "centroid model declares {} classes, need at least 2",
                        centroids.len()
                    )));
                }
                if let Some(row) = centroids.iter().find(|row| row.len() != n_features) {
                    return Err(ArtifactError::Dimensions(format!(
                        "centroid has {} entries for {n_features} columns",
                        row.len()
                    )));
                }
            }
        }
        Ok(Self { artifact })
    }

    /// Number of classes the model discriminates between.
    pub fn n_classes(&self) -> usize {
        match &self.artifact.model {
            ModelSpec::Logistic { classes, .. } => *classes,
            ModelSpec::Centroid { centroids } => centroids.len(),
        }
    }

    /// Whether per-class probability estimates are available.
    pub fn supports_proba(&self) -> bool {
        matches!(self.artifact.model, ModelSpec::Logistic { .. })
    }

    /// Predict the encoded class label for a raw record.
    ///
    /// Runs the feature deriver as the first stage, then the classifier.
    pub fn predict(&self, raw: &RawRecord) -> Result<usize, PredictError> {
        let x = self.vectorize(raw)?;
        let index = match &self.artifact.model {
            ModelSpec::Logistic { .. } => argmax(&self.class_scores(&x)),
            ModelSpec::Centroid { centroids } => {
                // Nearest centroid by squared Euclidean distance.
                argmax(
                    &centroids
                        .iter()
                        .map(|c| -squared_distance(&x, c))
                        .collect::<Vec<_>>(),
                )
            }
        };
        Ok(index)
    }

    /// Per-class probability estimates, or `None` if the model family
    /// does not support them. Callers decide the fallback.
    pub fn predict_proba(&self, raw: &RawRecord) -> Result<Option<Vec<f64>>, PredictError> {
        if !self.supports_proba() {
            return Ok(None);
        }
        let x = self.vectorize(raw)?;
        Ok(Some(softmax(&self.class_scores(&x))))
    }

    /// Derive features and project them into the model's column order.
    fn vectorize(&self, raw: &RawRecord) -> Result<Vec<f64>, PredictError> {
        let derived = features::derive(raw);
        self.artifact
            .feature_names
            .iter()
            .map(|name| {
                derived
                    .feature_value(name)
                    .ok_or_else(|| PredictError::MissingFeature(name.clone()))
            })
            .collect()
    }

    fn class_scores(&self, x: &[f64]) -> Vec<f64> {
        match &self.artifact.model {
            ModelSpec::Logistic {
                coefficients,
                intercepts,
                means,
                scales,
                ..
            } => {
                let z: Vec<f64> = x
                    .iter()
                    .zip(means.iter().zip(scales.iter()))
                    .map(|(v, (m, s))| if *s != 0.0 { (v - m) / s } else { v - m })
                    .collect();
                coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| b + row.iter().zip(&z).map(|(w, v)| w * v).sum::<f64>())
                    .collect()
            }
            ModelSpec::Centroid { .. } => Vec::new(),
        }
    }
}

/// The paired label encoder: encoded class index -> class name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Format version, gated against [`ARTIFACT_VERSION`] at load.
    pub version: u32,
    /// Class names in encoded order.
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Load and validate a label encoder artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let encoder: LabelEncoder =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ArtifactError::Malformed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        if encoder.version != ARTIFACT_VERSION {
            return Err(ArtifactError::VersionMismatch {
                found: encoder.version,
                expected: ARTIFACT_VERSION,
            });
        }
        if encoder.classes.is_empty() {
            return Err(ArtifactError::EmptyClasses);
        }
        tracing::info!(
            path = %path.display(),
            classes = encoder.classes.len(),
            "Loaded label encoder artifact"
        );
        Ok(encoder)
    }

    /// Decode an encoded label back to its class name.
    pub fn decode(&self, index: usize) -> Result<&str, PredictError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(PredictError::UnknownLabel {
                index,
                classes: self.classes.len(),
            })
    }
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Numerically stable softmax.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}
