//! Scorer implementations backed by `medtriage-model`.

use medtriage_model::{KeywordModel, LinearModel, ModelOutput};

use super::{ScoreOutput, Scorer, ScorerError};

impl From<ModelOutput> for ScoreOutput {
    fn from(output: ModelOutput) -> Self {
        match output {
            ModelOutput::Probabilities(entries) => ScoreOutput::Probabilities(entries.into_iter().collect()),
            ModelOutput::DecisionScores(entries) => ScoreOutput::RawScores(entries.into_iter().collect()),
        }
    }
}

impl Scorer for LinearModel {
    fn predict(&self, text: &str) -> Result<ScoreOutput, ScorerError> {
        Ok(LinearModel::predict(self, text).into())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

impl Scorer for KeywordModel {
    fn predict(&self, text: &str) -> Result<ScoreOutput, ScorerError> {
        Ok(KeywordModel::predict(self, text).into())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::{rank_scores, ConditionRanker};
    use std::sync::Arc;

    #[test]
    fn test_model_output_conversion() {
        let probs: ScoreOutput =
            ModelOutput::Probabilities(vec![("Influenza".into(), 0.4)]).into();
        assert!(matches!(probs, ScoreOutput::Probabilities(ref m) if m["Influenza"] == 0.4));

        let raw: ScoreOutput =
            ModelOutput::DecisionScores(vec![("Influenza".into(), -3.0)]).into();
        assert!(matches!(raw, ScoreOutput::RawScores(_)));
    }

    #[test]
    fn test_keyword_model_as_scorer() {
        let scorer: Arc<dyn Scorer> = Arc::new(KeywordModel::new());
        let ranked = ConditionRanker::new(3)
            .rank("vomiting, watery diarrhea and nausea", &scorer)
            .unwrap();

        assert_eq!(ranked[0].label, "Gastroenteritis");
        assert_eq!(ranked.len(), 3);
        assert_eq!(scorer.name(), "keyword");
    }

    #[test]
    fn test_keyword_model_ties_are_alphabetical() {
        let output = Scorer::predict(&KeywordModel::new(), "").unwrap();
        let ranked = rank_scores(output, 2);
        // Everything scores 0.0, so labels decide
        assert_eq!(ranked[0].label, "Acute Otitis Externa");
        assert_eq!(ranked[1].label, "Acute Sinusitis");
    }
}
