//! Condition ranking over a pluggable probabilistic scorer.
//!
//! Pipeline: Scorer (probabilities or raw scores) → Logistic transform →
//! Sort (probability desc, label asc) → Truncate to k

mod adapters;

pub use adapters::*;

use std::collections::BTreeMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use medtriage_model::sigmoid;
use thiserror::Error;

use crate::models::ConditionScore;

/// Default number of conditions carried in a result.
pub const DEFAULT_TOP_K: usize = 5;

/// Conditions at or below this probability are hidden from display.
pub const DISPLAY_THRESHOLD: f64 = 0.05;

/// Scorer errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    #[error("No scorer configured")]
    NotConfigured,

    #[error("Scorer failed: {0}")]
    Failed(String),

    #[error("Scorer timed out after {0:?}")]
    Timeout(Duration),
}

/// Ranker errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankerError {
    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(#[from] ScorerError),
}

pub type RankerResult<T> = Result<T, RankerError>;

/// Per-label output of a scorer.
///
/// A scorer reports whichever form it has; the ranker resolves raw scores to
/// probabilities with the logistic function.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutput {
    /// Independent per-label probabilities in [0, 1]
    Probabilities(BTreeMap<String, f64>),
    /// Raw real-valued decision scores
    RawScores(BTreeMap<String, f64>),
}

impl ScoreOutput {
    /// Resolve to probabilities, clamped to [0, 1]. Non-finite values are dropped.
    pub fn into_probabilities(self) -> BTreeMap<String, f64> {
        let (scores, raw) = match self {
            ScoreOutput::Probabilities(scores) => (scores, false),
            ScoreOutput::RawScores(scores) => (scores, true),
        };

        scores
            .into_iter()
            .filter_map(|(label, value)| {
                if !value.is_finite() {
                    tracing::warn!(%label, value, "Dropping non-finite score");
                    return None;
                }
                let p = if raw { sigmoid(value) } else { value };
                Some((label, p.clamp(0.0, 1.0)))
            })
            .collect()
    }
}

/// External text classifier: text in, per-label scores out.
///
/// Implementations must be shareable across threads; the ranker may run the
/// call on a worker thread to enforce a timeout.
pub trait Scorer: Send + Sync {
    fn predict(&self, text: &str) -> Result<ScoreOutput, ScorerError>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "scorer"
    }
}

/// Sort resolved probabilities (desc, ties by label asc) and keep `k`.
pub fn rank_scores(output: ScoreOutput, k: usize) -> Vec<ConditionScore> {
    let mut ranked: Vec<ConditionScore> = output
        .into_probabilities()
        .into_iter()
        .map(|(label, probability)| ConditionScore { label, probability })
        .collect();

    ranked.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.label.cmp(&b.label))
    });
    ranked.truncate(k);
    ranked
}

/// Ranks conditions for a text using a scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionRanker {
    k: usize,
    timeout: Option<Duration>,
}

impl Default for ConditionRanker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl ConditionRanker {
    /// Create a ranker keeping at most `k` conditions, with no timeout.
    pub fn new(k: usize) -> Self {
        Self { k, timeout: None }
    }

    /// Bound each scorer call by `timeout`.
    ///
    /// A call that times out is abandoned, not cancelled: its worker thread
    /// keeps running until the scorer returns. A scorer that hangs forever
    /// therefore holds one thread per timed-out call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Rank conditions for `text`.
    ///
    /// Fails with `ScoringUnavailable` when the scorer errors or exceeds the
    /// timeout; never returns an empty list in place of an error.
    pub fn rank(&self, text: &str, scorer: &Arc<dyn Scorer>) -> RankerResult<Vec<ConditionScore>> {
        let output = match self.timeout {
            Some(timeout) => predict_with_timeout(scorer, text, timeout)?,
            None => scorer.predict(text)?,
        };
        Ok(rank_scores(output, self.k))
    }
}

/// Run the scorer on a worker thread and wait at most `timeout`.
///
/// A timed-out call is abandoned; its result is discarded when it arrives.
fn predict_with_timeout(
    scorer: &Arc<dyn Scorer>,
    text: &str,
    timeout: Duration,
) -> Result<ScoreOutput, ScorerError> {
    let (tx, rx) = mpsc::channel();
    let worker_scorer = Arc::clone(scorer);
    let text = text.to_string();

    thread::Builder::new()
        .name("medtriage-scorer".into())
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(worker_scorer.predict(&text));
        })
        .map_err(|e| ScorerError::Failed(format!("could not start scorer thread: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(scorer = scorer.name(), ?timeout, "Scorer call timed out");
            Err(ScorerError::Timeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(ScorerError::Failed(
            "scorer thread exited without a result".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(ScoreOutput);

    impl Scorer for FixedScorer {
        fn predict(&self, _text: &str) -> Result<ScoreOutput, ScorerError> {
            Ok(self.0.clone())
        }
    }

    struct FailingScorer;

    impl Scorer for FailingScorer {
        fn predict(&self, _text: &str) -> Result<ScoreOutput, ScorerError> {
            Err(ScorerError::Failed("model not loaded".into()))
        }
    }

    struct SlowScorer(Duration);

    impl Scorer for SlowScorer {
        fn predict(&self, _text: &str) -> Result<ScoreOutput, ScorerError> {
            thread::sleep(self.0);
            Ok(ScoreOutput::Probabilities(BTreeMap::new()))
        }
    }

    struct PanickingScorer;

    impl Scorer for PanickingScorer {
        fn predict(&self, _text: &str) -> Result<ScoreOutput, ScorerError> {
            panic!("scorer bug");
        }
    }

    fn map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    fn labels(ranked: &[ConditionScore]) -> Vec<&str> {
        ranked.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_rank_sorts_descending() {
        let output = ScoreOutput::Probabilities(map(&[
            ("Common Cold", 0.2),
            ("Influenza", 0.7),
            ("Strep Throat", 0.4),
        ]));
        let ranked = rank_scores(output, 3);
        assert_eq!(labels(&ranked), vec!["Influenza", "Strep Throat", "Common Cold"]);
    }

    #[test]
    fn test_rank_ties_by_label() {
        let output = ScoreOutput::Probabilities(map(&[
            ("Tonsillitis", 0.5),
            ("Bronchiolitis", 0.5),
            ("Influenza", 0.9),
            ("Measles-like Illness", 0.5),
        ]));
        let ranked = rank_scores(output, 10);
        assert_eq!(
            labels(&ranked),
            vec!["Influenza", "Bronchiolitis", "Measles-like Illness", "Tonsillitis"]
        );
    }

    #[test]
    fn test_rank_truncates() {
        let output = ScoreOutput::Probabilities(map(&[("a", 0.1), ("b", 0.2), ("c", 0.3)]));
        assert_eq!(labels(&rank_scores(output.clone(), 2)), vec!["c", "b"]);
        assert!(rank_scores(output, 0).is_empty());
    }

    #[test]
    fn test_raw_scores_use_sigmoid() {
        let output = ScoreOutput::RawScores(map(&[("Influenza", 0.0), ("Gastroenteritis", 2.0)]));
        let ranked = rank_scores(output, 5);

        assert_eq!(ranked[0].label, "Gastroenteritis");
        assert!((ranked[0].probability - sigmoid(2.0)).abs() < 1e-12);
        assert!((ranked[1].probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_clamped_and_non_finite_dropped() {
        let output = ScoreOutput::Probabilities(map(&[
            ("over", 1.3),
            ("under", -0.2),
            ("nan", f64::NAN),
        ]));
        let probs = output.into_probabilities();
        assert_eq!(probs.len(), 2);
        assert_eq!(probs["over"], 1.0);
        assert_eq!(probs["under"], 0.0);
    }

    #[test]
    fn test_ranker_with_scorer() {
        let scorer: Arc<dyn Scorer> = Arc::new(FixedScorer(ScoreOutput::Probabilities(map(&[
            ("Influenza", 0.6),
            ("Common Cold", 0.3),
        ]))));
        let ranked = ConditionRanker::new(1).rank("fever", &scorer).unwrap();
        assert_eq!(labels(&ranked), vec!["Influenza"]);
    }

    #[test]
    fn test_ranker_surfaces_failure() {
        let scorer: Arc<dyn Scorer> = Arc::new(FailingScorer);
        let result = ConditionRanker::default().rank("fever", &scorer);
        assert!(matches!(
            result,
            Err(RankerError::ScoringUnavailable(ScorerError::Failed(_)))
        ));
    }

    #[test]
    fn test_ranker_timeout() {
        let scorer: Arc<dyn Scorer> = Arc::new(SlowScorer(Duration::from_millis(500)));
        let ranker = ConditionRanker::new(3).with_timeout(Duration::from_millis(20));
        let result = ranker.rank("fever", &scorer);
        assert_eq!(
            result,
            Err(RankerError::ScoringUnavailable(ScorerError::Timeout(
                Duration::from_millis(20)
            )))
        );
    }

    #[test]
    fn test_timed_out_worker_runs_to_completion() {
        let scorer: Arc<dyn Scorer> = Arc::new(SlowScorer(Duration::from_millis(300)));
        let ranker = ConditionRanker::new(3).with_timeout(Duration::from_millis(10));
        assert!(ranker.rank("fever", &scorer).is_err());

        // Abandoned worker still holds the scorer
        assert_eq!(Arc::strong_count(&scorer), 2);

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while Arc::strong_count(&scorer) > 1 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(Arc::strong_count(&scorer), 1);
    }

    #[test]
    fn test_ranker_within_timeout() {
        let scorer: Arc<dyn Scorer> = Arc::new(FixedScorer(ScoreOutput::RawScores(map(&[
            ("Influenza", 1.0),
        ]))));
        let ranker = ConditionRanker::new(3).with_timeout(Duration::from_secs(5));
        let ranked = ranker.rank("fever", &scorer).unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_ranker_scorer_panic() {
        let scorer: Arc<dyn Scorer> = Arc::new(PanickingScorer);
        let ranker = ConditionRanker::new(3).with_timeout(Duration::from_secs(5));
        assert!(matches!(
            ranker.rank("fever", &scorer),
            Err(RankerError::ScoringUnavailable(ScorerError::Failed(_)))
        ));
    }
}
