//! MedTriage Core Library
//!
//! Symptom triage decision engine: deterministic safety rules first, a
//! probabilistic condition ranker second.
//!
//! # Architecture
//!
//! ```text
//! TriageRequest ──validate──▶ TriageInput
//!                                  │
//!                 ┌────────────────┴────────────────┐
//!                 ▼                                 ▼
//!         Rule Classifier                  [demo_mode] Demo Case?
//!     (red flags → infant fever               │ yes        │ no
//!      → urgency → keywords)                  │            ▼
//!                 │                           │     Condition Ranker
//!                 │                           │    (Scorer, timeout)
//!                 └──────────────┬────────────┴────────────┘
//!                                ▼
//!                         Decision Merger
//!                   level = max(rule, demo case)
//!                                │
//!                                ▼
//!                  TriageResult + relief guidance
//! ```
//!
//! # Core Principle
//!
//! **The safety rules never depend on the scorer.** A triage level is always
//! returned, even when condition ranking fails.
//!
//! # Modules
//!
//! - [`rules`]: Red-flag detector, urgency scorer, rule classifier
//! - [`ranker`]: Scorer trait and condition ranking
//! - [`knowledge`]: Red flags, demo cases and relief guide tables
//! - [`engine`]: Decision merger
//! - [`config`]: TOML configuration
//! - [`validate`]: Request validation at the boundary
//! - [`wire`]: HTTP response shape

pub mod config;
pub mod engine;
pub mod knowledge;
pub mod models;
pub mod ranker;
pub mod rules;
pub mod validate;
pub mod wire;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineOptions, TriageEngine};
pub use knowledge::KnowledgeBase;
pub use models::{
    ConditionScore, ConditionSource, Exposure, ReliefGuidance, RiskFactor, Sex, TriageInput,
    TriageLevel, TriageResult,
};
pub use ranker::{ConditionRanker, RankerError, Scorer, ScorerError};
pub use rules::{RedFlagSet, TriageClassifier};
pub use validate::{InputError, TriageRequest};
pub use wire::TriageResponse;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedTriageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<InputError> for MedTriageError {
    fn from(e: InputError) -> Self {
        MedTriageError::InvalidInput(e.to_string())
    }
}

impl From<RankerError> for MedTriageError {
    fn from(e: RankerError) -> Self {
        MedTriageError::ScoringUnavailable(e.to_string())
    }
}

impl From<ConfigError> for MedTriageError {
    fn from(e: ConfigError) -> Self {
        MedTriageError::ConfigurationError(e.to_string())
    }
}

impl From<serde_json::Error> for MedTriageError {
    fn from(e: serde_json::Error) -> Self {
        MedTriageError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an engine from a TOML config file, or defaults when `None`.
///
/// Environment overrides are applied after the file.
#[uniffi::export]
pub fn open_engine(config_path: Option<String>) -> Result<Arc<MedTriageCore>, MedTriageError> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let config = config.with_env_overrides()?;
    Ok(Arc::new(MedTriageCore::from_config(&config)?))
}

/// Engine with built-in tables and the keyword model (for testing).
#[uniffi::export]
pub fn builtin_engine() -> Arc<MedTriageCore> {
    let config = EngineConfig::default();
    Arc::new(MedTriageCore::with_parts(
        KnowledgeBase::builtin(),
        Arc::new(medtriage_model::KeywordModel::new()),
        &config,
    ))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Shareable engine handle for FFI.
///
/// Holds only immutable state, so no lock is needed between calls.
#[derive(uniffi::Object)]
pub struct MedTriageCore {
    kb: Arc<KnowledgeBase>,
    scorer: Arc<dyn Scorer>,
    options: EngineOptions,
    demo_mode: bool,
    display_limit: usize,
    display_threshold: f64,
}

impl MedTriageCore {
    /// Load tables and scorer named by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let kb = KnowledgeBase::load(&config.tables)?;
        let scorer = config.load_scorer()?;
        Ok(Self::with_parts(kb, scorer, config))
    }

    pub fn with_parts(kb: KnowledgeBase, scorer: Arc<dyn Scorer>, config: &EngineConfig) -> Self {
        Self {
            kb: Arc::new(kb),
            scorer,
            options: EngineOptions {
                top_k: config.top_k,
                scorer_timeout: config.scorer_timeout,
            },
            demo_mode: config.demo_mode,
            display_limit: config.display_limit,
            display_threshold: config.display_threshold,
        }
    }

    /// Evaluate a validated input.
    pub fn evaluate_input(&self, input: &TriageInput, demo_mode: bool) -> TriageResult {
        self.engine().evaluate(input, demo_mode)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    fn engine(&self) -> TriageEngine<'_> {
        TriageEngine::with_options(&self.kb, Some(Arc::clone(&self.scorer)), self.options)
    }

    fn to_ffi(&self, result: TriageResult) -> FfiTriageResult {
        let displayed = result
            .displayed(self.display_threshold, self.display_limit)
            .into_iter()
            .cloned()
            .map(FfiConditionScore::from)
            .collect();

        FfiTriageResult {
            level: result.level.into(),
            level_label: result.level.label().to_string(),
            advice: result.level.advice().to_string(),
            is_red_flag: result.is_red_flag,
            reasons: result.reasons,
            displayed,
            conditions: result.conditions.into_iter().map(FfiConditionScore::from).collect(),
            condition_source: result.condition_source.into(),
            relief: result.relief.into_iter().map(FfiReliefGuidance::from).collect(),
        }
    }
}

#[uniffi::export]
impl MedTriageCore {
    // =========================================================================
    // Triage Operations
    // =========================================================================

    /// Evaluate a request using the configured demo mode.
    pub fn evaluate(&self, request: FfiTriageRequest) -> Result<FfiTriageResult, MedTriageError> {
        self.evaluate_with_mode(request, self.demo_mode)
    }

    /// Evaluate a request with an explicit demo mode.
    pub fn evaluate_with_mode(
        &self,
        request: FfiTriageRequest,
        demo_mode: bool,
    ) -> Result<FfiTriageResult, MedTriageError> {
        let input = TriageRequest::from(request).validate()?;
        Ok(self.to_ffi(self.evaluate_input(&input, demo_mode)))
    }

    /// Evaluate a JSON request body and return the wire JSON response.
    pub fn evaluate_json(&self, request_json: String) -> Result<String, MedTriageError> {
        let request: TriageRequest = serde_json::from_str(&request_json)?;
        let input = request.validate()?;
        let result = self.evaluate_input(&input, self.demo_mode);
        Ok(TriageResponse::from_result(&result, self.display_limit).to_json()?)
    }

    /// Rank conditions for free text, without triage rules.
    pub fn rank_conditions(&self, text: String) -> Result<Vec<FfiConditionScore>, MedTriageError> {
        let conditions = self.engine().rank(&text)?;
        Ok(conditions.into_iter().map(FfiConditionScore::from).collect())
    }

    /// Whether the text contains an emergency phrase.
    pub fn is_red_flag(&self, text: String) -> bool {
        self.kb.red_flags().detect(&text)
    }

    pub fn red_flag_phrases(&self) -> Vec<String> {
        self.kb.red_flags().phrases().to_vec()
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe triage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiTriageLevel {
    HomeCare,
    GpWithin48h,
    Urgent,
    Emergency,
}

impl From<TriageLevel> for FfiTriageLevel {
    fn from(level: TriageLevel) -> Self {
        match level {
            TriageLevel::HomeCare => FfiTriageLevel::HomeCare,
            TriageLevel::GpWithin48h => FfiTriageLevel::GpWithin48h,
            TriageLevel::Urgent => FfiTriageLevel::Urgent,
            TriageLevel::Emergency => FfiTriageLevel::Emergency,
        }
    }
}

/// FFI-safe condition source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiConditionSource {
    Model,
    DemoCase,
    Unavailable,
}

impl From<ConditionSource> for FfiConditionSource {
    fn from(source: ConditionSource) -> Self {
        match source {
            ConditionSource::Model => FfiConditionSource::Model,
            ConditionSource::DemoCase => FfiConditionSource::DemoCase,
            ConditionSource::Unavailable => FfiConditionSource::Unavailable,
        }
    }
}

/// FFI-safe triage request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageRequest {
    pub symptoms_text: String,
    pub age: f64,
    pub sex: Option<String>,
    pub duration_days: i64,
    pub fever_temp_c: Option<f64>,
    pub risk_factors: Vec<String>,
    pub exposures: Vec<String>,
}

impl From<FfiTriageRequest> for TriageRequest {
    fn from(request: FfiTriageRequest) -> Self {
        TriageRequest {
            symptoms_text: request.symptoms_text,
            age: request.age,
            sex: request.sex,
            duration_days: request.duration_days,
            fever_temp_c: request.fever_temp_c,
            risk_factors: request.risk_factors,
            exposures: request.exposures,
        }
    }
}

/// FFI-safe condition score.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiConditionScore {
    pub label: String,
    pub probability: f64,
}

impl From<ConditionScore> for FfiConditionScore {
    fn from(score: ConditionScore) -> Self {
        Self {
            label: score.label,
            probability: score.probability,
        }
    }
}

/// FFI-safe medication suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub note: String,
}

/// FFI-safe relief guidance.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReliefGuidance {
    pub key: String,
    pub title: String,
    pub medications: Vec<FfiMedication>,
    pub non_pharm: String,
}

impl From<ReliefGuidance> for FfiReliefGuidance {
    fn from(guide: ReliefGuidance) -> Self {
        Self {
            key: guide.key,
            title: guide.title,
            medications: guide
                .medications
                .into_iter()
                .map(|m| FfiMedication {
                    name: m.name,
                    note: m.note,
                })
                .collect(),
            non_pharm: guide.non_pharm,
        }
    }
}

/// FFI-safe triage result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageResult {
    pub level: FfiTriageLevel,
    pub level_label: String,
    pub advice: String,
    pub is_red_flag: bool,
    /// Why the level was chosen, deciding rule first
    pub reasons: Vec<String>,
    /// Ranked conditions (at most top_k)
    pub conditions: Vec<FfiConditionScore>,
    /// Conditions above the display threshold (at most display_limit)
    pub displayed: Vec<FfiConditionScore>,
    pub condition_source: FfiConditionSource,
    pub relief: Vec<FfiReliefGuidance>,
}
