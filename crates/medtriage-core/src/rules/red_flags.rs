//! Emergency phrase detection.

/// Built-in emergency phrases, in precedence order.
pub const DEFAULT_RED_FLAGS: &[&str] = &[
    "severe difficulty breathing",
    "struggling to breathe",
    "cannot breathe",
    "blue lips",
    "chest pain",
    "severe chest pain",
    "confusion",
    "unresponsive",
    "seizure",
    "seizures",
    "stiff neck with fever",
    "neck stiffness and fever",
    "severe dehydration",
    "no urine for 12 hours",
    "sunken eyes",
    "vomiting blood",
    "black stools",
    "severe abdominal pain",
    "fainting",
    "weak pulse",
    "severe bleeding",
];

/// Immutable, ordered list of emergency phrases.
///
/// Matching is literal substring containment on lower-cased text: no
/// tokenization and no word boundaries, so "seizure" also fires inside longer
/// words. Over-triggering is the safe direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedFlagSet {
    phrases: Vec<String>,
}

impl Default for RedFlagSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RedFlagSet {
    /// Create a set from phrases; phrases are lower-cased and blanks dropped.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// The built-in phrase list.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_RED_FLAGS)
    }

    /// Whether any phrase occurs in the text.
    pub fn detect(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// First phrase (in list order) occurring in the text.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.phrases
            .iter()
            .find(|p| lowered.contains(p.as_str()))
            .map(String::as_str)
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
