//! Relief guide keyed by condition name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Medication, ReliefGuidance};

/// File form of a relief guide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefGuideFile {
    pub entries: Vec<ReliefGuidance>,
    /// Condition label → guide key
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Case-insensitive lookup of relief guidance by condition name.
///
/// Condition labels that differ from guide keys (e.g. "Urinary Tract
/// Infection" vs "UTI") resolve through aliases.
#[derive(Debug, Clone, Default)]
pub struct ReliefGuide {
    entries: Vec<ReliefGuidance>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl ReliefGuide {
    /// Build a guide; a later entry with the same key replaces an earlier one.
    pub fn new(entries: Vec<ReliefGuidance>, aliases: HashMap<String, String>) -> Self {
        let mut guide = Self::default();
        for entry in entries {
            guide.insert(entry);
        }
        for (alias, key) in aliases {
            guide.add_alias(&alias, &key);
        }
        guide
    }

    pub fn from_file(file: ReliefGuideFile) -> Self {
        Self::new(file.entries, file.aliases)
    }

    /// The built-in guide.
    pub fn builtin() -> Self {
        Self::new(default_entries(), default_aliases())
    }

    /// Look up guidance for a condition label or guide key.
    pub fn lookup(&self, name: &str) -> Option<&ReliefGuidance> {
        let lower = name.trim().to_lowercase();
        let index = self.index.get(&lower).or_else(|| {
            self.aliases
                .get(&lower)
                .and_then(|key| self.index.get(key))
        })?;
        self.entries.get(*index)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, entry: ReliefGuidance) {
        let key = entry.key.trim().to_lowercase();
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Map a condition label onto a guide key.
    pub fn add_alias(&mut self, alias: &str, key: &str) {
        self.aliases
            .insert(alias.trim().to_lowercase(), key.trim().to_lowercase());
    }

    pub fn entries(&self) -> &[ReliefGuidance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(key: &str, title: &str, medications: &[(&str, &str)], non_pharm: &str) -> ReliefGuidance {
    ReliefGuidance {
        key: key.to_string(),
        title: title.to_string(),
        medications: medications
            .iter()
            .map(|(name, note)| Medication {
                name: name.to_string(),
                note: note.to_string(),
            })
            .collect(),
        non_pharm: non_pharm.to_string(),
    }
}

fn default_entries() -> Vec<ReliefGuidance> {
    vec![
        entry(
            "Common Cold",
            "Relief for Common Cold",
            &[
                ("Paracetamol (Acetaminophen)", "For sore throat or mild aches. Follow package instructions."),
                ("Decongestant Nasal Spray", "For runny/stuffy nose. Do not use for more than 3 days."),
            ],
            "Rest and stay hydrated with warm fluids like tea or soup.",
        ),
        entry(
            "Influenza",
            "Relief for Influenza (Flu)",
            &[("Ibuprofen or Paracetamol", "To reduce fever and alleviate body aches. Follow package instructions.")],
            "Strict bed rest is crucial. Isolate to prevent spreading to others.",
        ),
        entry(
            "Gastroenteritis",
            "Relief for Gastroenteritis",
            &[
                ("Oral Rehydration Salts", "Mix with water to prevent dehydration from diarrhea and vomiting."),
                ("Loperamide", "Can be used for diarrhea in adults if there's no fever or blood in stool."),
            ],
            "Sip clear fluids. Avoid solid food until vomiting stops, then reintroduce bland foods (e.g., bananas, rice, applesauce, toast).",
        ),
        entry(
            "Severe Bleeding",
            "Action for Severe Bleeding",
            &[],
            "This is a medical emergency. Call emergency services immediately. Apply firm, direct pressure to the wound with a clean cloth while waiting for professional help.",
        ),
        entry(
            "UTI",
            "Relief for Urinary Tract Infection (UTI)",
            &[("Phenazopyridine", "Can help with the burning pain until a doctor's appointment. This does not cure the infection.")],
            "Drink plenty of water to help flush out bacteria. A doctor's visit for antibiotics is necessary.",
        ),
        entry(
            "Strep Throat",
            "Relief for Sore Throat",
            &[
                ("Throat Lozenges (with benzocaine)", "Can provide temporary numbing for a very sore throat."),
                ("Paracetamol or Ibuprofen", "For pain and fever relief."),
            ],
            "Gargle with warm salt water. A doctor's visit is needed to test for strep and get antibiotics if required.",
        ),
        entry(
            "Severe Abdominal Pain",
            "Action for Severe Abdominal Pain",
            &[],
            "Do not eat, drink, or take any pain medication. This could be a surgical emergency (like appendicitis). Seek immediate emergency care.",
        ),
        entry(
            "Conjunctivitis",
            "Relief for Conjunctivitis (Pink Eye)",
            &[("Antihistamine Eye Drops", "Can help if the cause is allergic.")],
            "Use a warm, damp cloth to gently clean any discharge from the eye. Wash hands frequently to avoid spreading the infection. A doctor can prescribe antibiotic drops if it is bacterial.",
        ),
        entry(
            "Infant Fever",
            "Action for Infant with High Fever",
            &[],
            "A high fever in an infant requires immediate medical attention. A doctor must determine the cause and prescribe the correct medication and dosage. Do not give medication without a doctor's explicit advice.",
        ),
        entry(
            "Skin Infection",
            "Care for Skin Infection",
            &[("Topical Antibiotic Ointment", "Can be applied to a minor cut, but a spreading infection requires a doctor.")],
            "Keep the area clean and dry. You can draw a line around the red area to monitor if it's spreading. See a doctor, as oral antibiotics are likely necessary.",
        ),
    ]
}

fn default_aliases() -> HashMap<String, String> {
    let mut map = HashMap::new();

    map.insert("urinary tract infection".into(), "uti".into());
    map.insert("cellulitis".into(), "skin infection".into());
    map.insert("skin abscess".into(), "skin infection".into());
    map.insert("impetigo".into(), "skin infection".into());
    map.insert("tonsillitis".into(), "strep throat".into());
    map.insert("food poisoning".into(), "gastroenteritis".into());
    map.insert("traumatic injury".into(), "severe bleeding".into());
    map.insert("suspected appendicitis".into(), "severe abdominal pain".into());

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        let guide = ReliefGuide::builtin();
        assert_eq!(guide.len(), 10);

        let cold = guide.lookup("common cold").unwrap();
        assert_eq!(cold.title, "Relief for Common Cold");
        assert_eq!(cold.medications.len(), 2);
    }

    #[test]
    fn test_lookup_by_alias() {
        let guide = ReliefGuide::builtin();
        assert_eq!(guide.lookup("Urinary Tract Infection").unwrap().key, "UTI");
        assert_eq!(guide.lookup("Skin Abscess").unwrap().key, "Skin Infection");
    }

    #[test]
    fn test_missing_entry() {
        let guide = ReliefGuide::builtin();
        assert!(guide.lookup("Scabies").is_none());
        assert!(ReliefGuide::default().lookup("UTI").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut guide = ReliefGuide::builtin();
        guide.insert(entry("uti", "Replaced", &[], "Drink water."));
        assert_eq!(guide.len(), 10);
        assert_eq!(guide.lookup("UTI").unwrap().title, "Replaced");
    }

    #[test]
    fn test_from_file_json() {
        let json = r#"{
            "entries": [
                {"key": "Scabies", "title": "Care for Scabies", "non_pharm": "Wash bedding in hot water."}
            ],
            "aliases": {"Scabies Infestation": "Scabies"}
        }"#;
        let file: ReliefGuideFile = serde_json::from_str(json).unwrap();
        let guide = ReliefGuide::from_file(file);

        let found = guide.lookup("scabies infestation").unwrap();
        assert_eq!(found.title, "Care for Scabies");
        assert!(found.medications.is_empty());
    }
}
