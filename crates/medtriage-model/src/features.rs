//! TF-IDF feature extraction.
//!
//! Mirrors the vectorizer used at training time:
//! - lower-casing
//! - word tokens of two or more alphanumeric characters
//! - word n-grams over a configurable range (default unigrams + bigrams)
//! - optional sublinear term frequency (`1 + ln(tf)`)
//! - L2 row normalization

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::output::{ModelError, ModelResult};

/// Sparse feature vector: (feature index, weight), sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term → feature index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    pub idf: Vec<f64>,
    /// Inclusive n-gram range (min, max)
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default = "default_sublinear_tf")]
    pub sublinear_tf: bool,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn default_sublinear_tf() -> bool {
    true
}

impl TfidfVectorizer {
    /// Number of features.
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    /// Check internal consistency of a deserialized vectorizer.
    pub fn validate(&self) -> ModelResult<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::InvalidArtifact(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let size = self.idf.len();
        if let Some((term, index)) = self.vocabulary.iter().find(|(_, &i)| i >= size) {
            return Err(ModelError::InvalidArtifact(format!(
                "vocabulary term {:?} has index {} but idf has {} entries",
                term, index, size
            )));
        }

        if self.idf.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact("idf contains non-finite values".into()));
        }

        Ok(())
    }

    /// Transform text into an L2-normalized sparse TF-IDF vector.
    ///
    /// Terms outside the vocabulary are ignored. Empty or fully unknown text
    /// yields an empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in ngrams(&tokenize(text), self.ngram_range) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();
        vector.sort_by_key(|(index, _)| *index);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }

        vector
    }
}

/// Split text into lower-cased word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Build space-joined word n-grams for every n in the inclusive range.
pub fn ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut grams = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        grams.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    grams
}
