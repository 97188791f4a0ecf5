//! Risk and urgency scoring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::RiskFactor;

use super::{
    contains_any, HIGH_FEVER_C, PROLONGED_FEVER_DAYS, RESPIRATORY_DISTRESS_TERMS,
    URINARY_PAIN_TERMS,
};

/// Outcome of urgency scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    /// Number of independently satisfied urgency conditions (0-3)
    pub urgent_score: u8,
    /// Patient has at least one high-risk factor
    pub high_risk: bool,
}

impl UrgencyAssessment {
    /// Score text and vitals. Absent readings never satisfy a condition.
    ///
    /// Conditions, one point each:
    /// - fever ≥ 39.0 °C lasting ≥ 3 days
    /// - a breathing-difficulty phrase
    /// - "urinary" together with flank or back pain
    pub fn score(
        text: &str,
        fever_temp_c: Option<f64>,
        duration_days: u32,
        risk_factors: &BTreeSet<RiskFactor>,
    ) -> Self {
        let lowered = text.to_lowercase();

        let prolonged_high_fever = fever_temp_c
            .map(|t| t >= HIGH_FEVER_C && duration_days >= PROLONGED_FEVER_DAYS)
            .unwrap_or(false);
        let respiratory_distress = contains_any(&lowered, RESPIRATORY_DISTRESS_TERMS);
        let urinary_with_pain =
            lowered.contains("urinary") && contains_any(&lowered, URINARY_PAIN_TERMS);

        let urgent_score = [prolonged_high_fever, respiratory_distress, urinary_with_pain]
            .iter()
            .filter(|hit| **hit)
            .count() as u8;

        Self {
            urgent_score,
            high_risk: risk_factors.iter().any(RiskFactor::is_high_risk),
        }
    }

    /// Any urgency condition in a high-risk patient.
    pub fn is_urgent_for_fragile_patient(&self) -> bool {
        self.urgent_score >= 1 && self.high_risk
    }
}
