//! Decision merger.
//!
//! Pipeline: Rule Classifier → (Demo Case | Condition Ranker) → Relief lookup

use std::sync::Arc;
use std::time::Duration;

use crate::knowledge::KnowledgeBase;
use crate::models::{ConditionScore, ConditionSource, ReliefGuidance, TriageInput, TriageResult};
use crate::ranker::{ConditionRanker, RankerResult, Scorer, ScorerError, DEFAULT_TOP_K};
use crate::rules::{RuleDecision, TriageClassifier};

/// Per-engine tuning taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Conditions kept in a result
    pub top_k: usize,
    /// Bound on each scorer call
    pub scorer_timeout: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            scorer_timeout: None,
        }
    }
}

/// Merges the rule decision with a condition list into one result.
///
/// Borrows the knowledge base; build one per call site or per request.
pub struct TriageEngine<'a> {
    kb: &'a KnowledgeBase,
    classifier: TriageClassifier<'a>,
    ranker: ConditionRanker,
    scorer: Option<Arc<dyn Scorer>>,
}

impl<'a> TriageEngine<'a> {
    /// Create an engine with default options.
    pub fn new(kb: &'a KnowledgeBase, scorer: Option<Arc<dyn Scorer>>) -> Self {
        Self::with_options(kb, scorer, EngineOptions::default())
    }

    pub fn with_options(
        kb: &'a KnowledgeBase,
        scorer: Option<Arc<dyn Scorer>>,
        options: EngineOptions,
    ) -> Self {
        let mut ranker = ConditionRanker::new(options.top_k);
        if let Some(timeout) = options.scorer_timeout {
            ranker = ranker.with_timeout(timeout);
        }
        Self {
            kb,
            classifier: TriageClassifier::new(kb.red_flags()),
            ranker,
            scorer,
        }
    }

    /// Evaluate one input.
    ///
    /// Always returns a level. The rule classifier runs first and its level
    /// is a floor: a demonstration case may raise it, never lower it. When
    /// the scorer fails the condition list is empty and the source is
    /// `Unavailable`.
    pub fn evaluate(&self, input: &TriageInput, demo_mode: bool) -> TriageResult {
        let decision = self.classifier.classify_input(input);

        if demo_mode {
            if let Some(case) = self.kb.canned_cases().match_text(&input.symptoms_text) {
                tracing::debug!(
                    rule_level = %decision.level,
                    case_level = %case.triage,
                    "Matched demonstration case"
                );
                let relief = self
                    .kb
                    .relief()
                    .lookup(&case.relief_key)
                    .cloned()
                    .into_iter()
                    .collect();
                let mut result =
                    self.merge(decision, case.conditions.clone(), ConditionSource::DemoCase, relief);
                if case.triage > result.level {
                    result.level = case.triage;
                    result
                        .reasons
                        .push(format!("Demonstration case raised the level to {}", case.triage));
                }
                return result;
            }
        }

        match self.rank(&input.symptoms_text) {
            Ok(conditions) => {
                let relief = self.relief_for(&conditions);
                self.merge(decision, conditions, ConditionSource::Model, relief)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Conditions unavailable; returning rule-based level only");
                self.merge(decision, Vec::new(), ConditionSource::Unavailable, Vec::new())
            }
        }
    }

    /// Rank conditions with the configured scorer.
    pub fn rank(&self, text: &str) -> RankerResult<Vec<ConditionScore>> {
        let scorer = self.scorer.as_ref().ok_or(ScorerError::NotConfigured)?;
        self.ranker.rank(text, scorer)
    }

    pub fn classifier(&self) -> &TriageClassifier<'a> {
        &self.classifier
    }

    pub fn ranker(&self) -> &ConditionRanker {
        &self.ranker
    }

    fn merge(
        &self,
        decision: RuleDecision,
        conditions: Vec<ConditionScore>,
        condition_source: ConditionSource,
        relief: Vec<ReliefGuidance>,
    ) -> TriageResult {
        TriageResult {
            level: decision.level,
            is_red_flag: decision.is_red_flag,
            reasons: vec![decision.rule.reason()],
            rule: decision.rule,
            conditions,
            condition_source,
            relief,
        }
    }

    /// Relief entries for ranked conditions, in rank order, one per key.
    fn relief_for(&self, conditions: &[ConditionScore]) -> Vec<ReliefGuidance> {
        let mut relief: Vec<ReliefGuidance> = Vec::new();
        for condition in conditions {
            if let Some(entry) = self.kb.relief().lookup(&condition.label) {
                if !relief.iter().any(|r| r.key == entry.key) {
                    relief.push(entry.clone());
                }
            }
        }
        relief
    }
}
