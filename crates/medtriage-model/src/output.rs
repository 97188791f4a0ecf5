//! Model output and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Artifact checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// How a model reports its per-label scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Calibrated per-label probabilities in [0, 1]
    Probability,
    /// Raw decision-function values (unbounded)
    Decision,
}

/// Per-label scores produced for one piece of text.
///
/// Labels keep the model's own label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelOutput {
    /// Independent per-label probabilities (multi-label, need not sum to 1)
    Probabilities(Vec<(String, f64)>),
    /// Raw per-label decision scores
    DecisionScores(Vec<(String, f64)>),
}

impl ModelOutput {
    /// The kind of values carried.
    pub fn kind(&self) -> OutputKind {
        match self {
            ModelOutput::Probabilities(_) => OutputKind::Probability,
            ModelOutput::DecisionScores(_) => OutputKind::Decision,
        }
    }

    /// Label/value pairs regardless of kind.
    pub fn entries(&self) -> &[(String, f64)] {
        match self {
            ModelOutput::Probabilities(entries) | ModelOutput::DecisionScores(entries) => entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_output_kind() {
        let probs = ModelOutput::Probabilities(vec![("Influenza".into(), 0.4)]);
        let raw = ModelOutput::DecisionScores(vec![("Influenza".into(), -1.2)]);

        assert_eq!(probs.kind(), OutputKind::Probability);
        assert_eq!(raw.kind(), OutputKind::Decision);
        assert_eq!(raw.entries()[0].1, -1.2);
        assert_eq!(probs.len(), 1);
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_output_kind_serde() {
        let kind: OutputKind = serde_json::from_str("\"decision\"").unwrap();
        assert_eq!(kind, OutputKind::Decision);
        assert_eq!(serde_json::to_string(&OutputKind::Probability).unwrap(), "\"probability\"");
    }
}
