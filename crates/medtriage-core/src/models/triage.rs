//! Triage outcome models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ReliefGuidance;
use crate::rules::TriageRule;

/// Ordinal triage urgency, ascending.
///
/// `Emergency` is terminal: no later stage may lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    #[serde(rename = "Home care")]
    HomeCare,
    #[serde(rename = "GP within 48h")]
    GpWithin48h,
    #[serde(rename = "Urgent")]
    Urgent,
    #[serde(rename = "Emergency")]
    Emergency,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 4] = [
        TriageLevel::HomeCare,
        TriageLevel::GpWithin48h,
        TriageLevel::Urgent,
        TriageLevel::Emergency,
    ];

    /// Display label, also used on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            TriageLevel::HomeCare => "Home care",
            TriageLevel::GpWithin48h => "GP within 48h",
            TriageLevel::Urgent => "Urgent",
            TriageLevel::Emergency => "Emergency",
        }
    }

    /// One-line guidance shown next to the level.
    pub fn advice(&self) -> &'static str {
        match self {
            TriageLevel::HomeCare => "Home care likely appropriate. Monitor and rest.",
            TriageLevel::GpWithin48h => "See a GP/clinician within 48 hours.",
            TriageLevel::Urgent => "See a clinician as soon as possible (same day).",
            TriageLevel::Emergency => "Seek immediate medical care now.",
        }
    }

    /// Parse a display label or identifier, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "home care" | "homecare" | "self care" => Some(TriageLevel::HomeCare),
            "gp within 48h" | "gp" | "gpwithin48h" => Some(TriageLevel::GpWithin48h),
            "urgent" => Some(TriageLevel::Urgent),
            "emergency" => Some(TriageLevel::Emergency),
            _ => None,
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, TriageLevel::Emergency)
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A condition label with its estimated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionScore {
    /// Condition label (e.g., "Influenza")
    pub label: String,
    /// Probability in [0, 1]; independent per label
    pub probability: f64,
}

impl ConditionScore {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Where the condition list of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionSource {
    /// Ranked from the probabilistic scorer
    Model,
    /// Fixed list from a demonstration case
    DemoCase,
    /// Scorer failed or timed out; list is empty
    Unavailable,
}

/// Final triage recommendation for one request.
///
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    /// Recommended urgency
    pub level: TriageLevel,
    /// Whether an emergency phrase was detected in the text
    pub is_red_flag: bool,
    /// Rule that set the base level
    pub rule: TriageRule,
    /// Why the level was chosen, deciding rule first
    pub reasons: Vec<String>,
    /// Plausible conditions, descending probability (at most 5)
    pub conditions: Vec<ConditionScore>,
    /// Origin of `conditions`
    pub condition_source: ConditionSource,
    /// Relief guidance matched to the conditions
    pub relief: Vec<ReliefGuidance>,
}

impl TriageResult {
    /// Conditions worth showing: probability above `threshold`, at most `limit`.
    pub fn displayed(&self, threshold: f64, limit: usize) -> Vec<&ConditionScore> {
        self.conditions
            .iter()
            .filter(|c| c.probability > threshold)
            .take(limit)
            .collect()
    }

    /// Highest-probability condition, if any.
    pub fn top_condition(&self) -> Option<&ConditionScore> {
        self.conditions.first()
    }
}
