//! Rule-based triage classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{RiskFactor, TriageInput, TriageLevel};

use super::{
    contains_any, RedFlagSet, UrgencyAssessment, ESCALATION_TERMS, INFANT_AGE_YEARS,
    INFANT_FEVER_C,
};

/// Which rule produced a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TriageRule {
    /// An emergency phrase was found
    RedFlag { phrase: String },
    /// Infant under one year with fever ≥ 38 °C
    InfantFever,
    /// Urgency condition in a high-risk patient
    FragilePatient { urgent_score: u8 },
    /// Escalation keyword in the text
    KeywordEscalation,
    /// Nothing matched
    Default,
}

impl TriageRule {
    /// Human-readable reason for the decision.
    pub fn reason(&self) -> String {
        match self {
            TriageRule::RedFlag { phrase } => {
                format!("Emergency phrase detected: \"{}\"", phrase)
            }
            TriageRule::InfantFever => format!(
                "Infant under {} year with fever of {:.1} °C or more",
                INFANT_AGE_YEARS, INFANT_FEVER_C
            ),
            TriageRule::FragilePatient { urgent_score } => {
                format!("{} urgency finding(s) in a high-risk patient", urgent_score)
            }
            TriageRule::KeywordEscalation => "Symptoms mention an escalation keyword".to_string(),
            TriageRule::Default => "No escalation rule matched".to_string(),
        }
    }
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDecision {
    pub level: TriageLevel,
    pub is_red_flag: bool,
    pub rule: TriageRule,
}

impl RuleDecision {
    fn new(level: TriageLevel, rule: TriageRule) -> Self {
        Self {
            level,
            is_red_flag: matches!(rule, TriageRule::RedFlag { .. }),
            rule,
        }
    }

    /// (level, red flag) pair.
    pub fn as_pair(&self) -> (TriageLevel, bool) {
        (self.level, self.is_red_flag)
    }
}

/// Decision table mapping text and vitals to a triage level.
///
/// Rules are checked in order and the first match wins:
/// 1. red flag → Emergency
/// 2. infant (< 1 year) with fever ≥ 38 °C → Urgent
/// 3. urgency score ≥ 1 in a high-risk patient → Urgent
/// 4. escalation keyword → GP within 48h
/// 5. otherwise → Home care
///
/// Total: no input fails, and nothing here depends on the scorer.
pub struct TriageClassifier<'a> {
    red_flags: &'a RedFlagSet,
}

impl<'a> TriageClassifier<'a> {
    pub fn new(red_flags: &'a RedFlagSet) -> Self {
        Self { red_flags }
    }

    /// Classify raw fields.
    pub fn classify(
        &self,
        text: &str,
        age: Option<f64>,
        fever_temp_c: Option<f64>,
        duration_days: u32,
        risk_factors: &BTreeSet<RiskFactor>,
    ) -> RuleDecision {
        if let Some(phrase) = self.red_flags.first_match(text) {
            tracing::debug!(phrase, "Red flag detected");
            return RuleDecision::new(
                TriageLevel::Emergency,
                TriageRule::RedFlag {
                    phrase: phrase.to_string(),
                },
            );
        }

        let infant = age.map(|a| a < INFANT_AGE_YEARS).unwrap_or(false);
        let infant_fever = fever_temp_c.map(|t| t >= INFANT_FEVER_C).unwrap_or(false);
        if infant && infant_fever {
            return RuleDecision::new(TriageLevel::Urgent, TriageRule::InfantFever);
        }

        let urgency = UrgencyAssessment::score(text, fever_temp_c, duration_days, risk_factors);
        if urgency.is_urgent_for_fragile_patient() {
            return RuleDecision::new(
                TriageLevel::Urgent,
                TriageRule::FragilePatient {
                    urgent_score: urgency.urgent_score,
                },
            );
        }

        if contains_any(&text.to_lowercase(), ESCALATION_TERMS) {
            return RuleDecision::new(TriageLevel::GpWithin48h, TriageRule::KeywordEscalation);
        }

        RuleDecision::new(TriageLevel::HomeCare, TriageRule::Default)
    }

    /// Classify a validated input.
    pub fn classify_input(&self, input: &TriageInput) -> RuleDecision {
        self.classify(
            &input.symptoms_text,
            Some(input.age),
            input.fever_temp_c,
            input.duration_days,
            &input.risk_factors,
        )
    }

    /// Whether the text alone is an emergency.
    pub fn is_red_flag(&self, text: &str) -> bool {
        self.red_flags.detect(text)
    }
}
