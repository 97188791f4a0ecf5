//! Request validation at the boundary.
//!
//! Raw requests arrive as loosely typed fields (HTTP JSON, form widgets, FFI
//! records). `TriageRequest` checks ranges and vocabulary and produces a
//! `TriageInput`; nothing out of range ever reaches the rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;

use crate::models::{normalize_fever, Exposure, RiskFactor, Sex, TriageInput};

pub const AGE_RANGE: (f64, f64) = (0.0, 110.0);
pub const DURATION_RANGE: (i64, i64) = (0, 60);
pub const FEVER_RANGE: (f64, f64) = (0.0, 45.0);

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Boundary validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid input: {field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid input: unknown risk factor {term:?}{}", hint(.suggestion))]
    UnknownRiskFactor {
        term: String,
        suggestion: Option<String>,
    },

    #[error("Invalid input: unknown exposure {term:?}{}", hint(.suggestion))]
    UnknownExposure {
        term: String,
        suggestion: Option<String>,
    },

    #[error("Invalid input: unknown sex {0:?} (expected M or F)")]
    UnknownSex(String),
}

pub type InputResult<T> = Result<T, InputError>;

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {:?}?)", s),
        None => String::new(),
    }
}

/// Raw triage request as received on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageRequest {
    pub symptoms_text: String,
    pub age: f64,
    pub sex: Option<String>,
    pub duration_days: i64,
    pub fever_temp_c: Option<f64>,
    pub risk_factors: Vec<String>,
    pub exposures: Vec<String>,
}

impl Default for TriageRequest {
    fn default() -> Self {
        Self {
            symptoms_text: String::new(),
            age: 25.0,
            sex: None,
            duration_days: 3,
            fever_temp_c: None,
            risk_factors: Vec::new(),
            exposures: Vec::new(),
        }
    }
}

impl TriageRequest {
    pub fn new(symptoms_text: impl Into<String>) -> Self {
        Self {
            symptoms_text: symptoms_text.into(),
            ..Self::default()
        }
    }

    /// Validate, rejecting anything out of range.
    pub fn validate(&self) -> InputResult<TriageInput> {
        check_range("age", self.age, AGE_RANGE)?;
        check_range(
            "duration_days",
            self.duration_days as f64,
            (DURATION_RANGE.0 as f64, DURATION_RANGE.1 as f64),
        )?;
        if let Some(temp) = self.fever_temp_c {
            check_range("fever_temp_c", temp, FEVER_RANGE)?;
        }

        Ok(TriageInput {
            symptoms_text: self.symptoms_text.clone(),
            age: self.age,
            sex: self.parse_sex()?,
            duration_days: self.duration_days as u32,
            fever_temp_c: normalize_fever(self.fever_temp_c),
            risk_factors: parse_risk_factors(&self.risk_factors)?,
            exposures: parse_exposures(&self.exposures)?,
        })
    }

    /// Validate, clamping numeric fields into range instead of rejecting.
    ///
    /// Age and fever are rounded to one decimal. Unknown vocabulary is still
    /// rejected.
    pub fn clamped(&self) -> InputResult<TriageInput> {
        let age = if self.age.is_nan() {
            TriageRequest::default().age
        } else {
            round_tenth(self.age.clamp(AGE_RANGE.0, AGE_RANGE.1))
        };
        let duration = self.duration_days.clamp(DURATION_RANGE.0, DURATION_RANGE.1);
        let fever = self
            .fever_temp_c
            .filter(|t| !t.is_nan())
            .map(|t| round_tenth(t.clamp(FEVER_RANGE.0, FEVER_RANGE.1)));

        TriageRequest {
            age,
            duration_days: duration,
            fever_temp_c: fever,
            ..self.clone()
        }
        .validate()
    }

    fn parse_sex(&self) -> InputResult<Option<Sex>> {
        match self.sex.as_deref() {
            None => Ok(None),
            Some(value) => Sex::parse(value).ok_or_else(|| InputError::UnknownSex(value.to_string())),
        }
    }
}

impl From<&TriageInput> for TriageRequest {
    fn from(input: &TriageInput) -> Self {
        Self {
            symptoms_text: input.symptoms_text.clone(),
            age: input.age,
            sex: input.sex.map(|s| match s {
                Sex::Male => "M".to_string(),
                Sex::Female => "F".to_string(),
            }),
            duration_days: i64::from(input.duration_days),
            fever_temp_c: input.fever_temp_c,
            risk_factors: input.risk_factors.iter().map(|r| r.as_str().to_string()).collect(),
            exposures: input.exposures.iter().map(|e| e.as_str().to_string()).collect(),
        }
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> InputResult<()> {
    // NaN fails the containment check
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn parse_risk_factors(terms: &[String]) -> InputResult<BTreeSet<RiskFactor>> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|term| {
            RiskFactor::parse(term).ok_or_else(|| InputError::UnknownRiskFactor {
                term: term.clone(),
                suggestion: suggest(term, RiskFactor::ALL.iter().map(|r| r.as_str())),
            })
        })
        .collect()
}

fn parse_exposures(terms: &[String]) -> InputResult<BTreeSet<Exposure>> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|term| {
            Exposure::parse(term).ok_or_else(|| InputError::UnknownExposure {
                term: term.clone(),
                suggestion: suggest(term, Exposure::ALL.iter().map(|e| e.as_str())),
            })
        })
        .collect()
}

/// Closest vocabulary term by Jaro-Winkler similarity, if close enough.
fn suggest<'v>(term: &str, vocabulary: impl Iterator<Item = &'v str>) -> Option<String> {
    let needle = term.trim().to_lowercase();
    vocabulary
        .map(|candidate| (candidate, jaro_winkler(&needle, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}
