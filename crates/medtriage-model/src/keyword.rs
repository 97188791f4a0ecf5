//! Keyword-overlap model for use without a trained artifact.

use serde::{Deserialize, Serialize};

use crate::output::ModelOutput;

/// A condition with its characteristic symptom phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomProfile {
    pub label: String,
    pub keywords: Vec<String>,
}

impl SymptomProfile {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Scores each condition by the fraction of its keywords present in the text.
///
/// Deterministic and dependency-free; a stand-in for the trained model in
/// demos and tests.
#[derive(Debug, Clone)]
pub struct KeywordModel {
    profiles: Vec<SymptomProfile>,
}

impl Default for KeywordModel {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordModel {
    /// Create a model over the built-in symptom bank.
    pub fn new() -> Self {
        Self {
            profiles: default_symptom_bank(),
        }
    }

    /// Create a model over custom profiles.
    pub fn with_profiles(profiles: Vec<SymptomProfile>) -> Self {
        Self { profiles }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.label.as_str())
    }

    /// Per-condition probabilities: matched keywords / total keywords.
    pub fn predict(&self, text: &str) -> ModelOutput {
        let lower = text.to_lowercase();
        let scores = self
            .profiles
            .iter()
            .map(|profile| {
                let total = profile.keywords.len();
                let hits = profile
                    .keywords
                    .iter()
                    .filter(|k| lower.contains(k.as_str()))
                    .count();
                let p = if total == 0 { 0.0 } else { hits as f64 / total as f64 };
                (profile.label.clone(), p)
            })
            .collect();

        ModelOutput::Probabilities(scores)
    }
}

/// Built-in symptom bank, one profile per condition label.
fn default_symptom_bank() -> Vec<SymptomProfile> {
    vec![
        SymptomProfile::new("Common Cold", &["runny nose", "sneezing", "sore throat", "mild cough", "congestion", "low-grade fever", "fatigue"]),
        SymptomProfile::new("Influenza", &["high fever", "body aches", "severe fatigue", "dry cough", "headache", "chills"]),
        SymptomProfile::new("Strep Throat", &["sore throat", "fever", "painful swallowing", "swollen tonsils", "no cough"]),
        SymptomProfile::new("Viral Pharyngitis", &["sore throat", "cough", "hoarseness", "runny nose", "fever"]),
        SymptomProfile::new("Tonsillitis", &["sore throat", "fever", "swollen tonsils", "difficulty swallowing", "ear pain"]),
        SymptomProfile::new("Acute Sinusitis", &["facial pain", "purulent nasal discharge", "nasal congestion", "tooth pain", "headache"]),
        SymptomProfile::new("Community-Acquired Pneumonia", &["fever", "productive cough", "shortness of breath", "chest pain", "fatigue"]),
        SymptomProfile::new("COVID-like Illness", &["fever", "dry cough", "loss of smell", "loss of taste", "fatigue", "sore throat"]),
        SymptomProfile::new("Otitis Media", &["ear pain", "fever", "irritability in child", "hearing difficulty"]),
        SymptomProfile::new("Acute Otitis Externa", &["ear pain", "itchy ear", "ear canal tenderness", "discharge from ear"]),
        SymptomProfile::new("Bronchiolitis", &["wheezing", "cough", "fast breathing", "fever", "feeding difficulty"]),
        SymptomProfile::new("Gastroenteritis", &["vomiting", "watery diarrhea", "abdominal cramps", "fever", "nausea"]),
        SymptomProfile::new("Food Poisoning", &["sudden vomiting", "diarrhea", "abdominal pain", "fever", "nausea"]),
        SymptomProfile::new("Urinary Tract Infection", &["burning urination", "frequent urination", "urgency", "lower abdominal pain", "fever"]),
        SymptomProfile::new("Conjunctivitis", &["red eye", "itchy eyes", "tearing", "discharge from eye", "gritty sensation"]),
        SymptomProfile::new("Impetigo", &["honey-colored crusts", "red sores", "itchy rash", "around nose and mouth"]),
        SymptomProfile::new("Cellulitis", &["warm red skin", "tenderness", "swelling", "fever"]),
        SymptomProfile::new("Skin Abscess", &["painful lump", "swelling", "pus", "fever", "tender to touch"]),
        SymptomProfile::new("Scabies", &["intense itching", "worse at night", "burrow lines", "rash between fingers"]),
        SymptomProfile::new("Hand-Foot-and-Mouth Disease", &["fever", "mouth ulcers", "rash on hands", "rash on feet"]),
        SymptomProfile::new("Chickenpox (Varicella)", &["itchy blistering rash", "fever", "rash in crops", "fatigue"]),
        SymptomProfile::new("Measles-like Illness", &["fever", "cough", "runny nose", "conjunctivitis", "rash"]),
        SymptomProfile::new("Dengue-like Illness", &["high fever", "severe headache", "pain behind eyes", "joint pain", "rash"]),
        SymptomProfile::new("Typhoid-like Illness", &["prolonged fever", "abdominal pain", "headache", "constipation or diarrhea"]),
        SymptomProfile::new("Malaria-like Illness", &["fever with chills", "sweats", "headache", "fatigue", "body aches"]),
    ]
}
