//! One-vs-rest linear text classifier loaded from a JSON artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::features::TfidfVectorizer;
use crate::output::{sigmoid, ModelError, ModelOutput, ModelResult, OutputKind};

/// Serialized form of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    /// Condition labels, one per classifier row
    pub labels: Vec<String>,
    /// Whether the model exposes probabilities or raw decision scores
    pub output: OutputKind,
    /// Fitted vectorizer
    pub vectorizer: TfidfVectorizer,
    /// Coefficients, `labels.len()` rows of `num_features` columns
    pub coefficients: Vec<Vec<f64>>,
    /// Intercept per label
    pub intercepts: Vec<f64>,
}

/// A loaded linear model ready for inference.
#[derive(Debug, Clone)]
pub struct LinearModel {
    artifact: LinearArtifact,
    fingerprint: String,
}

impl LinearModel {
    /// Build a model from an in-memory artifact.
    pub fn from_artifact(artifact: LinearArtifact) -> ModelResult<Self> {
        validate_artifact(&artifact)?;
        let bytes = serde_json::to_vec(&artifact)?;
        Ok(Self {
            fingerprint: sha256_hex(&bytes),
            artifact,
        })
    }

    /// Parse a model from JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> ModelResult<Self> {
        let artifact: LinearArtifact = serde_json::from_slice(bytes)?;
        validate_artifact(&artifact)?;
        Ok(Self {
            fingerprint: sha256_hex(bytes),
            artifact,
        })
    }

    /// Load a model artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        Self::load_verified(path, None)
    }

    /// Load a model artifact, checking its SHA-256 digest when one is given.
    pub fn load_verified<P: AsRef<Path>>(path: P, expected_sha256: Option<&str>) -> ModelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        if let Some(expected) = expected_sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(ModelError::ChecksumMismatch {
                    expected: expected.trim().to_lowercase(),
                    actual,
                });
            }
        }

        let model = Self::from_json_bytes(&bytes)?;
        tracing::info!(
            path = %path.display(),
            labels = model.labels().len(),
            features = model.artifact.vectorizer.num_features(),
            fingerprint = %model.fingerprint,
            "Loaded linear model"
        );
        Ok(model)
    }

    /// Condition labels in model order.
    pub fn labels(&self) -> &[String] {
        &self.artifact.labels
    }

    /// Output kind declared by the artifact.
    pub fn output_kind(&self) -> OutputKind {
        self.artifact.output
    }

    /// Hex SHA-256 of the artifact bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Raw decision value per label.
    pub fn decision_function(&self, text: &str) -> Vec<f64> {
        let features = self.artifact.vectorizer.transform(text);
        self.artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, intercept)| {
                intercept + features.iter().map(|(i, w)| row[*i] * w).sum::<f64>()
            })
            .collect()
    }

    /// Score text, in the form the artifact declares.
    pub fn predict(&self, text: &str) -> ModelOutput {
        let labeled = self
            .artifact
            .labels
            .iter()
            .cloned()
            .zip(self.decision_function(text));

        match self.artifact.output {
            OutputKind::Probability => {
                ModelOutput::Probabilities(labeled.map(|(l, s)| (l, sigmoid(s))).collect())
            }
            OutputKind::Decision => ModelOutput::DecisionScores(labeled.collect()),
        }
    }
}

fn validate_artifact(artifact: &LinearArtifact) -> ModelResult<()> {
    artifact.vectorizer.validate()?;

    let labels = artifact.labels.len();
    if labels == 0 {
        return Err(ModelError::InvalidArtifact("model has no labels".into()));
    }
    if artifact.coefficients.len() != labels || artifact.intercepts.len() != labels {
        return Err(ModelError::InvalidArtifact(format!(
            "expected {} coefficient rows and intercepts, got {} and {}",
            labels,
            artifact.coefficients.len(),
            artifact.intercepts.len()
        )));
    }

    let features = artifact.vectorizer.num_features();
    if let Some((label, row)) = artifact
        .labels
        .iter()
        .zip(&artifact.coefficients)
        .find(|(_, row)| row.len() != features)
    {
        return Err(ModelError::InvalidArtifact(format!(
            "coefficient row for {:?} has {} columns, expected {}",
            label,
            row.len(),
            features
        )));
    }

    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
