//! Patient input models.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient sex as captured by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Parse a form value. Empty string means "not provided".
    pub fn parse(value: &str) -> Option<Option<Self>> {
        match value.trim().to_uppercase().as_str() {
            "" => Some(None),
            "M" | "MALE" => Some(Some(Sex::Male)),
            "F" | "FEMALE" => Some(Some(Sex::Female)),
            _ => None,
        }
    }
}

/// Risk factor vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "asthma")]
    Asthma,
    #[serde(rename = "diabetes")]
    Diabetes,
    #[serde(rename = "immunocompromised")]
    Immunocompromised,
    #[serde(rename = "pregnancy")]
    Pregnancy,
    #[serde(rename = "infant<1y")]
    InfantUnderOne,
    #[serde(rename = "elder>65")]
    ElderOver65,
    #[serde(rename = "heart_disease")]
    HeartDisease,
    #[serde(rename = "lung_disease")]
    LungDisease,
    #[serde(rename = "kidney_disease")]
    KidneyDisease,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 9] = [
        RiskFactor::Asthma,
        RiskFactor::Diabetes,
        RiskFactor::Immunocompromised,
        RiskFactor::Pregnancy,
        RiskFactor::InfantUnderOne,
        RiskFactor::ElderOver65,
        RiskFactor::HeartDisease,
        RiskFactor::LungDisease,
        RiskFactor::KidneyDisease,
    ];

    /// Vocabulary term as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Asthma => "asthma",
            RiskFactor::Diabetes => "diabetes",
            RiskFactor::Immunocompromised => "immunocompromised",
            RiskFactor::Pregnancy => "pregnancy",
            RiskFactor::InfantUnderOne => "infant<1y",
            RiskFactor::ElderOver65 => "elder>65",
            RiskFactor::HeartDisease => "heart_disease",
            RiskFactor::LungDisease => "lung_disease",
            RiskFactor::KidneyDisease => "kidney_disease",
        }
    }

    /// Parse a vocabulary term (case-insensitive).
    pub fn parse(term: &str) -> Option<Self> {
        let lower = term.trim().to_lowercase();
        Self::ALL.into_iter().find(|r| r.as_str() == lower)
    }

    /// Whether this factor marks the patient as high risk.
    ///
    /// Asthma and diabetes are recorded but do not count.
    pub fn is_high_risk(&self) -> bool {
        !matches!(self, RiskFactor::Asthma | RiskFactor::Diabetes)
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exposure vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    SickContact,
    FoodOut,
    WaterExposure,
    InsectBites,
    Travel,
}

impl Exposure {
    pub const ALL: [Exposure; 5] = [
        Exposure::SickContact,
        Exposure::FoodOut,
        Exposure::WaterExposure,
        Exposure::InsectBites,
        Exposure::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exposure::SickContact => "sick_contact",
            Exposure::FoodOut => "food_out",
            Exposure::WaterExposure => "water_exposure",
            Exposure::InsectBites => "insect_bites",
            Exposure::Travel => "travel",
        }
    }

    pub fn parse(term: &str) -> Option<Self> {
        let lower = term.trim().to_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == lower)
    }
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input to the triage engine.
///
/// Produced by the boundary layer (`validate`); ranges are already checked
/// and a fever of exactly 0 has been turned into "not measured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageInput {
    /// Free-text symptom description
    pub symptoms_text: String,
    /// Age in years (0-110, fractional for infants)
    pub age: f64,
    /// Sex, if provided
    pub sex: Option<Sex>,
    /// Days since symptom onset (0-60)
    pub duration_days: u32,
    /// Measured temperature in °C; `None` when not measured
    pub fever_temp_c: Option<f64>,
    /// Risk factors, order irrelevant
    pub risk_factors: BTreeSet<RiskFactor>,
    /// Exposures, order irrelevant
    pub exposures: BTreeSet<Exposure>,
}

impl TriageInput {
    /// Create an input with only the required fields.
    pub fn new(symptoms_text: impl Into<String>, age: f64) -> Self {
        Self {
            symptoms_text: symptoms_text.into(),
            age,
            sex: None,
            duration_days: 0,
            fever_temp_c: None,
            risk_factors: BTreeSet::new(),
            exposures: BTreeSet::new(),
        }
    }

    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    /// Set the measured temperature. A reading of 0 means "not measured".
    pub fn with_fever(mut self, temp_c: f64) -> Self {
        self.fever_temp_c = normalize_fever(Some(temp_c));
        self
    }

    pub fn with_risk_factor(mut self, factor: RiskFactor) -> Self {
        self.risk_factors.insert(factor);
        self
    }

    pub fn with_exposure(mut self, exposure: Exposure) -> Self {
        self.exposures.insert(exposure);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Whether any risk factor marks the patient as high risk.
    pub fn is_high_risk(&self) -> bool {
        self.risk_factors.iter().any(RiskFactor::is_high_risk)
    }
}

/// Treat a 0 °C reading as absent.
pub fn normalize_fever(temp_c: Option<f64>) -> Option<f64> {
    temp_c.filter(|t| *t != 0.0)
}
