//! Deterministic safety rules.
//!
//! Pipeline: Red-Flag Detection → Urgency Scoring → Triage Classification
//!
//! Every threshold used to assign a triage level lives in this module; other
//! components call [`TriageClassifier`] instead of re-implementing the rules.

mod classifier;
mod red_flags;
mod urgency;

pub use classifier::*;
pub use red_flags::*;
pub use urgency::*;

/// Fever (°C) counted toward urgency when it has lasted long enough.
pub const HIGH_FEVER_C: f64 = 39.0;

/// Minimum fever duration (days) for the high-fever urgency condition.
pub const PROLONGED_FEVER_DAYS: u32 = 3;

/// Patients younger than this (years) are infants.
pub const INFANT_AGE_YEARS: f64 = 1.0;

/// Fever (°C) that makes any infant urgent.
pub const INFANT_FEVER_C: f64 = 38.0;

/// Breathing-difficulty phrases counted toward urgency.
pub const RESPIRATORY_DISTRESS_TERMS: &[&str] = &[
    "shortness of breath",
    "breathless",
    "wheezing",
    "fast breathing",
];

/// Urinary symptoms only count when paired with one of these.
pub const URINARY_PAIN_TERMS: &[&str] = &["flank pain", "back pain"];

/// Lowest-confidence escalation phrases, checked last.
pub const ESCALATION_TERMS: &[&str] = &[
    "high fever",
    "productive cough",
    "persistent",
    "purulent",
    "severe",
];

fn contains_any(lowered_text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lowered_text.contains(t))
}
