//! Read-only lookup tables shared by every request.
//!
//! Red-flag phrases, demonstration cases and the relief guide are loaded once
//! at startup into a [`KnowledgeBase`] and handed to engines by reference.
//! Nothing mutates them afterwards, so no locking is needed.

mod demo_cases;
mod relief;

pub use demo_cases::*;
pub use relief::*;

use crate::config::{read_json, ConfigError, ConfigResult, TablesConfig, MAX_TOP_K};
use crate::models::CannedCase;
use crate::rules::RedFlagSet;

/// Process-wide immutable tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    red_flags: RedFlagSet,
    canned_cases: CannedCaseTable,
    relief: ReliefGuide,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// Built-in tables.
    pub fn builtin() -> Self {
        Self {
            red_flags: RedFlagSet::builtin(),
            canned_cases: CannedCaseTable::builtin(),
            relief: ReliefGuide::builtin(),
        }
    }

    /// Assemble and validate tables.
    pub fn new(
        red_flags: RedFlagSet,
        canned_cases: CannedCaseTable,
        relief: ReliefGuide,
    ) -> ConfigResult<Self> {
        if red_flags.is_empty() {
            return Err(ConfigError::InvalidTable(
                "red-flag list is empty; the safety layer cannot run without it".into(),
            ));
        }
        for (i, case) in canned_cases.cases().iter().enumerate() {
            validate_case(i, case)?;
        }

        Ok(Self {
            red_flags,
            canned_cases,
            relief,
        })
    }

    /// Load tables, replacing built-ins with any files the config names.
    pub fn load(tables: &TablesConfig) -> ConfigResult<Self> {
        let red_flags = match &tables.red_flags {
            Some(path) => RedFlagSet::new(read_json::<Vec<String>>(path)?),
            None => RedFlagSet::builtin(),
        };
        let canned_cases = match &tables.canned_cases {
            Some(path) => CannedCaseTable::new(read_json::<Vec<CannedCase>>(path)?),
            None => CannedCaseTable::builtin(),
        };
        let relief = match &tables.relief_guide {
            Some(path) => ReliefGuide::from_file(read_json::<ReliefGuideFile>(path)?),
            None => ReliefGuide::builtin(),
        };

        let kb = Self::new(red_flags, canned_cases, relief)?;
        tracing::info!(
            red_flags = kb.red_flags.len(),
            canned_cases = kb.canned_cases.len(),
            relief_entries = kb.relief.len(),
            "Loaded knowledge base"
        );
        Ok(kb)
    }

    pub fn red_flags(&self) -> &RedFlagSet {
        &self.red_flags
    }

    pub fn canned_cases(&self) -> &CannedCaseTable {
        &self.canned_cases
    }

    pub fn relief(&self) -> &ReliefGuide {
        &self.relief
    }
}

fn validate_case(index: usize, case: &CannedCase) -> ConfigResult<()> {
    if case.trigger_keywords.is_empty() {
        return Err(ConfigError::InvalidTable(format!(
            "demo case {} has no trigger keywords",
            index
        )));
    }
    if case.conditions.len() > MAX_TOP_K {
        return Err(ConfigError::InvalidTable(format!(
            "demo case {} has {} conditions, at most {} allowed",
            index,
            case.conditions.len(),
            MAX_TOP_K
        )));
    }
    if let Some(bad) = case
        .conditions
        .iter()
        .find(|c| !(0.0..=1.0).contains(&c.probability))
    {
        return Err(ConfigError::InvalidTable(format!(
            "demo case {} has probability {} for {:?}",
            index, bad.probability, bad.label
        )));
    }
    if case
        .conditions
        .windows(2)
        .any(|pair| pair[0].probability < pair[1].probability)
    {
        return Err(ConfigError::InvalidTable(format!(
            "demo case {} conditions are not in descending probability order",
            index
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConditionScore, TriageLevel};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_is_valid() {
        let kb = KnowledgeBase::builtin();
        assert!(KnowledgeBase::new(
            kb.red_flags().clone(),
            kb.canned_cases().clone(),
            kb.relief().clone()
        )
        .is_ok());
    }

    #[test]
    fn test_empty_red_flags_rejected() {
        let result = KnowledgeBase::new(
            RedFlagSet::new(Vec::<String>::new()),
            CannedCaseTable::builtin(),
            ReliefGuide::builtin(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidTable(_))));
    }

    #[test]
    fn test_bad_case_rejected() {
        let unordered = CannedCase {
            trigger_keywords: vec!["rash".into()],
            triage: TriageLevel::HomeCare,
            conditions: vec![
                ConditionScore::new("Scabies", 0.2),
                ConditionScore::new("Impetigo", 0.7),
            ],
            relief_key: "Skin Infection".into(),
        };
        let result = KnowledgeBase::new(
            RedFlagSet::builtin(),
            CannedCaseTable::new(vec![unordered]),
            ReliefGuide::builtin(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidTable(_))));
    }

    #[test]
    fn test_case_with_too_many_conditions_rejected() {
        let crowded = CannedCase {
            trigger_keywords: vec!["aches".into()],
            triage: TriageLevel::HomeCare,
            conditions: ["Influenza", "Common Cold", "COVID-19", "Sinusitis", "Migraine", "Strain"]
                .iter()
                .map(|label| ConditionScore::new(*label, 0.1))
                .collect(),
            relief_key: "Flu".into(),
        };
        let result = KnowledgeBase::new(
            RedFlagSet::builtin(),
            CannedCaseTable::new(vec![crowded.clone()]),
            ReliefGuide::builtin(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidTable(_))));

        let mut trimmed = crowded;
        trimmed.conditions.truncate(5);
        assert!(KnowledgeBase::new(
            RedFlagSet::builtin(),
            CannedCaseTable::new(vec![trimmed]),
            ReliefGuide::builtin(),
        )
        .is_ok());
    }

    #[test]
    fn test_load_from_files() {
        let flags = write_temp(r#"["Turning Blue", "passed out"]"#);
        let cases = write_temp(
            r#"[{
                "trigger_keywords": ["Itchy Rash"],
                "triage": "Home care",
                "conditions": [{"label": "Contact Dermatitis", "probability": 0.8}],
                "relief_key": "Rash"
            }]"#,
        );

        let tables = TablesConfig {
            red_flags: Some(flags.path().to_path_buf()),
            canned_cases: Some(cases.path().to_path_buf()),
            relief_guide: None,
        };
        let kb = KnowledgeBase::load(&tables).unwrap();

        assert!(kb.red_flags().detect("he is TURNING BLUE"));
        assert!(!kb.red_flags().detect("chest pain"));
        assert_eq!(kb.canned_cases().match_text("itchy rash").unwrap().relief_key, "Rash");
        assert_eq!(kb.relief().len(), 10);
    }

    #[test]
    fn test_load_missing_file() {
        let tables = TablesConfig {
            red_flags: Some(PathBuf::from("/nonexistent/red_flags.json")),
            ..TablesConfig::default()
        };
        assert!(matches!(
            KnowledgeBase::load(&tables),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_malformed_file() {
        let flags = write_temp("{not json");
        let tables = TablesConfig {
            red_flags: Some(flags.path().to_path_buf()),
            ..TablesConfig::default()
        };
        assert!(matches!(
            KnowledgeBase::load(&tables),
            Err(ConfigError::Json { .. })
        ));
    }
}
