//! Relief guidance models.

use serde::{Deserialize, Serialize};

/// An over-the-counter option with its usage note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub note: String,
}

/// Suggested relief measures for one condition.
///
/// Educational only; never a prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliefGuidance {
    /// Guide key (e.g., "UTI", "Common Cold")
    pub key: String,
    /// Heading shown to the user
    pub title: String,
    /// Suggested medications, possibly empty
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Non-pharmacological advice
    pub non_pharm: String,
}
