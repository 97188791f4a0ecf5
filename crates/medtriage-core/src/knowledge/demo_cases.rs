//! Demonstration case table.

use crate::models::{CannedCase, ConditionScore, TriageLevel};

/// Ordered table of demonstration cases.
///
/// Order matters: the first case whose keywords match wins, even when a later
/// case would match more keywords.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CannedCaseTable {
    cases: Vec<CannedCase>,
}

impl CannedCaseTable {
    /// Create a table; trigger keywords are lower-cased and blanks dropped.
    pub fn new(cases: Vec<CannedCase>) -> Self {
        let cases = cases
            .into_iter()
            .map(|mut case| {
                case.trigger_keywords = case
                    .trigger_keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                case
            })
            .collect();
        Self { cases }
    }

    /// The built-in demonstration table.
    pub fn builtin() -> Self {
        Self::new(default_cases())
    }

    /// First case with a trigger keyword in the text.
    pub fn match_text(&self, text: &str) -> Option<&CannedCase> {
        let lowered = text.to_lowercase();
        self.cases.iter().find(|case| case.matches(&lowered))
    }

    pub fn cases(&self) -> &[CannedCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn case(
    triggers: &[&str],
    triage: TriageLevel,
    conditions: &[(&str, f64)],
    relief_key: &str,
) -> CannedCase {
    CannedCase {
        trigger_keywords: triggers.iter().map(|t| t.to_string()).collect(),
        triage,
        conditions: conditions
            .iter()
            .map(|(label, p)| ConditionScore::new(*label, *p))
            .collect(),
        relief_key: relief_key.to_string(),
    }
}

fn default_cases() -> Vec<CannedCase> {
    vec![
        case(
            &["runny nose", "sneezing", "mild sore throat", "stuffy nose", "nasal congestion", "sore throat", "cough", "phlegm", "common cold", "post nasal drip", "head cold", "throat hurts", "itchy throat", "chest cough"],
            TriageLevel::HomeCare,
            &[("Common Cold", 0.85), ("Viral Pharyngitis", 0.10), ("Acute Sinusitis", 0.05)],
            "Common Cold",
        ),
        case(
            &["high fever", "severe body aches", "chills", "feverish", "feeling hot", "temperature", "muscle pain", "flu-like symptoms", "influenza", "sweating", "headache", "aches all over", "extreme fatigue", "exhaustion", "weakness"],
            TriageLevel::Urgent,
            &[("Influenza", 0.90), ("COVID-like Illness", 0.05), ("Community-Acquired Pneumonia", 0.05)],
            "Influenza",
        ),
        case(
            &["watery diarrhea", "nausea", "vomiting", "stomach cramps", "food poisoning", "stomach bug", "gastroenteritis", "stomach flu", "loose stools", "sick to my stomach", "upset stomach", "dehydrated", "cramping", "bathroom a lot"],
            TriageLevel::HomeCare,
            &[("Gastroenteritis", 0.70), ("Food Poisoning", 0.30)],
            "Gastroenteritis",
        ),
        case(
            &["severe bleeding", "won't stop bleeding", "heavy bleeding", "deep cut", "gushing blood", "traumatic injury", "serious wound", "bleeding profusely", "uncontrolled bleeding", "arterial bleed", "vein cut"],
            TriageLevel::Emergency,
            &[("Traumatic Injury", 0.99)],
            "Severe Bleeding",
        ),
        case(
            &["frequent urge to urinate", "burning sensation", "painful urination", "uti", "urinary tract infection", "bladder infection", "pain peeing", "burning pee", "can't hold it", "cloudy urine"],
            TriageLevel::GpWithin48h,
            &[("Urinary Tract Infection", 0.95)],
            "UTI",
        ),
        case(
            &["painful sore throat", "hurts to swallow", "strep throat", "white spots on tonsils", "swollen tonsils", "sore throat", "strep", "throat pain", "scratchy throat", "difficulty swallowing", "painful swallowing"],
            TriageLevel::GpWithin48h,
            &[("Strep Throat", 0.75), ("Tonsillitis", 0.20), ("Viral Pharyngitis", 0.05)],
            "Strep Throat",
        ),
        case(
            &["severe abdominal pain", "lower right side", "appendicitis", "stomach pain", "severe stomach pain", "sharp pain in abdomen", "belly pain", "abdominal cramps", "sudden abdominal pain", "pain in belly button", "side pain"],
            TriageLevel::Emergency,
            &[("Suspected Appendicitis", 0.90), ("Gastroenteritis", 0.10)],
            "Severe Abdominal Pain",
        ),
        case(
            &["red eye", "itchy eye", "yellow discharge", "goopy eye", "pink eye", "conjunctivitis", "eye infection", "crusty eye", "eye is swollen", "sore eye", "eye is watery"],
            TriageLevel::HomeCare,
            &[("Conjunctivitis", 0.98)],
            "Conjunctivitis",
        ),
        case(
            &["infant", "high fever", "baby crying", "not feeding well", "infant sick", "baby fever", "child fever", "baby fussy", "infant fever", "fever in baby", "baby with temp", "baby has cough"],
            TriageLevel::Urgent,
            &[("Bronchiolitis", 0.40), ("Common Cold", 0.30), ("Otitis Media (Ear Infection)", 0.20)],
            "Infant Fever",
        ),
        case(
            &["cut on leg", "red and swollen", "skin infection", "cellulitis", "spreading redness", "abscess", "infected wound", "warm to touch", "pus", "boil"],
            TriageLevel::GpWithin48h,
            &[("Cellulitis", 0.80), ("Skin Abscess", 0.20)],
            "Skin Infection",
        ),
    ]
}
