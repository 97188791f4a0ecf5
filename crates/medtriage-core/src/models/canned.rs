//! Demonstration case models.

use serde::{Deserialize, Serialize};

use super::{ConditionScore, TriageLevel};

/// A fixed demonstration scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedCase {
    /// Lower-case phrases; any one appearing in the text selects the case
    pub trigger_keywords: Vec<String>,
    /// Stored triage level
    pub triage: TriageLevel,
    /// Fixed condition list, descending probability
    pub conditions: Vec<ConditionScore>,
    /// Relief guide key for this case
    pub relief_key: String,
}

impl CannedCase {
    /// Whether any trigger keyword occurs in already lower-cased text.
    pub fn matches(&self, lowered_text: &str) -> bool {
        self.trigger_keywords
            .iter()
            .any(|k| lowered_text.contains(k.as_str()))
    }

    /// Primary condition label (first entry).
    pub fn primary_condition(&self) -> Option<&str> {
        self.conditions.first().map(|c| c.label.as_str())
    }
}
