//! Text classification models for symptom descriptions.
//!
//! This crate turns free-text symptom descriptions into per-condition scores.
//! It knows nothing about triage levels or safety rules; the decision engine
//! in `medtriage-core` consumes its output through a scorer adapter.
//!
//! Two models are provided:
//! - [`LinearModel`]: TF-IDF features + one-vs-rest linear coefficients,
//!   loaded from a JSON artifact produced offline.
//! - [`KeywordModel`]: deterministic keyword overlap against a symptom bank,
//!   used when no trained artifact is available.

pub mod features;
pub mod keyword;
pub mod linear;
pub mod output;

pub use features::*;
pub use keyword::*;
pub use linear::*;
pub use output::*;
