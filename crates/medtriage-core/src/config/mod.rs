//! Engine configuration.
//!
//! Settings come from an optional TOML file, then environment overrides:
//!
//! ```toml
//! demo_mode = false
//! top_k = 5
//! display_limit = 3
//! display_threshold = 0.05
//! scorer_timeout_ms = 2000
//!
//! [tables]
//! red_flags = "tables/red_flags.json"
//! canned_cases = "tables/demo_cases.json"
//! relief_guide = "tables/relief.json"
//!
//! [model]
//! path = "artifacts/model.json"
//! sha256 = "…"
//! ```
//!
//! Every failure here is a startup error; nothing in this module runs per
//! request.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use medtriage_model::{KeywordModel, LinearModel, ModelError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::ranker::{Scorer, DEFAULT_TOP_K, DISPLAY_THRESHOLD};

/// Environment variable forcing demo mode on or off.
pub const DEMO_MODE_ENV: &str = "MEDTRIAGE_DEMO_MODE";

/// Default bound on a single scorer call.
pub const DEFAULT_SCORER_TIMEOUT_MS: u64 = 2_000;

/// Conditions shown in rendered views.
pub const DEFAULT_DISPLAY_LIMIT: usize = 3;

/// Largest accepted `top_k`.
pub const MAX_TOP_K: usize = DEFAULT_TOP_K;

/// Largest accepted `display_limit`.
pub const MAX_DISPLAY_LIMIT: usize = DEFAULT_DISPLAY_LIMIT;

/// Configuration errors. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Paths of table files replacing the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TablesConfig {
    /// JSON array of phrases
    pub red_flags: Option<PathBuf>,
    /// JSON array of demo cases
    pub canned_cases: Option<PathBuf>,
    /// JSON relief guide (`entries` + `aliases`)
    pub relief_guide: Option<PathBuf>,
}

/// Trained model artifact location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON artifact
    pub path: PathBuf,
    /// Expected hex SHA-256 of the artifact
    pub sha256: Option<String>,
}

/// Main engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Consult demonstration cases before the scorer
    pub demo_mode: bool,
    /// Conditions carried in a result
    pub top_k: usize,
    /// Conditions shown in rendered views and on the wire
    pub display_limit: usize,
    /// Conditions at or below this probability are hidden from display
    pub display_threshold: f64,
    /// Bound on each scorer call; `None` waits indefinitely
    pub scorer_timeout: Option<Duration>,
    /// Table overrides
    pub tables: TablesConfig,
    /// Trained model; the keyword model is used when absent
    pub model: Option<ModelConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            top_k: DEFAULT_TOP_K,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            display_threshold: DISPLAY_THRESHOLD,
            scorer_timeout: Some(Duration::from_millis(DEFAULT_SCORER_TIMEOUT_MS)),
            tables: TablesConfig::default(),
            model: None,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub demo_mode: Option<bool>,
    pub top_k: Option<usize>,
    pub display_limit: Option<usize>,
    pub display_threshold: Option<f64>,
    /// 0 disables the timeout
    pub scorer_timeout_ms: Option<u64>,
    pub tables: Option<TablesConfig>,
    pub model: Option<ModelConfig>,
}

impl EngineConfig {
    /// Load from a TOML file. Relative table/model paths resolve against the
    /// file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        tracing::info!(path = %path.display(), demo_mode = config.demo_mode, "Loaded configuration");
        Ok(config)
    }

    /// Parse TOML on top of defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(demo_mode) = file.demo_mode {
            config.demo_mode = demo_mode;
        }
        if let Some(top_k) = file.top_k {
            config.top_k = top_k;
        }
        if let Some(limit) = file.display_limit {
            config.display_limit = limit;
        }
        if let Some(threshold) = file.display_threshold {
            config.display_threshold = threshold;
        }
        if let Some(ms) = file.scorer_timeout_ms {
            config.scorer_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(tables) = file.tables {
            config.tables = tables;
        }
        config.model = file.model;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DEMO_MODE_ENV) {
            self.demo_mode = parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidSetting(format!("{}={:?} is not a boolean", DEMO_MODE_ENV, value))
            })?;
        }
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_TOP_K).contains(&self.top_k) {
            return Err(ConfigError::InvalidSetting(format!(
                "top_k must be in 1..={}, got {}",
                MAX_TOP_K, self.top_k
            )));
        }
        if !(1..=MAX_DISPLAY_LIMIT).contains(&self.display_limit) {
            return Err(ConfigError::InvalidSetting(format!(
                "display_limit must be in 1..={}, got {}",
                MAX_DISPLAY_LIMIT, self.display_limit
            )));
        }
        if !(0.0..1.0).contains(&self.display_threshold) {
            return Err(ConfigError::InvalidSetting(format!(
                "display_threshold must be in [0, 1), got {}",
                self.display_threshold
            )));
        }
        Ok(())
    }

    /// Load the configured scorer: the trained model when one is set,
    /// otherwise the keyword model.
    pub fn load_scorer(&self) -> ConfigResult<Arc<dyn Scorer>> {
        match &self.model {
            Some(model) => {
                let linear = LinearModel::load_verified(&model.path, model.sha256.as_deref())?;
                Ok(Arc::new(linear))
            }
            None => {
                tracing::info!("No model configured; using keyword model");
                Ok(Arc::new(KeywordModel::new()))
            }
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(p) = self.tables.red_flags.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.tables.canned_cases.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.tables.relief_guide.as_mut() {
            resolve(p);
        }
        if let Some(model) = self.model.as_mut() {
            resolve(&mut model.path);
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read and parse a JSON table file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
