//! HTTP wire shape.
//!
//! ```json
//! {"triage": "Urgent", "emergency": false,
//!  "top_conditions": ["Influenza", "Common Cold"],
//!  "top_probabilities": [0.82, 0.11]}
//! ```
//!
//! Conditions and probabilities are parallel arrays aligned by index.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DISPLAY_LIMIT;
use crate::models::TriageResult;

/// Response body for `POST /triage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResponse {
    /// Level display label
    pub triage: String,
    /// Red-flag phrase detected
    pub emergency: bool,
    pub top_conditions: Vec<String>,
    pub top_probabilities: Vec<f64>,
}

impl TriageResponse {
    /// Project a result onto the wire shape, keeping the first `limit`
    /// conditions.
    pub fn from_result(result: &TriageResult, limit: usize) -> Self {
        let (top_conditions, top_probabilities) = result
            .conditions
            .iter()
            .take(limit)
            .map(|c| (c.label.clone(), c.probability))
            .unzip();

        Self {
            triage: result.level.label().to_string(),
            emergency: result.is_red_flag,
            top_conditions,
            top_probabilities,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&TriageResult> for TriageResponse {
    fn from(result: &TriageResult) -> Self {
        Self::from_result(result, DEFAULT_DISPLAY_LIMIT)
    }
}
