//! Configuration for the quality gates.
//!
//! All tunables (scoring weights, the differentiation threshold, the
//! regeneration budget, variation batch settings) live in immutable structs
//! that components receive in their constructors. They can be loaded from a
//! TOML file with environment-variable overrides.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Tolerance used when checking that scoring weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative weight of each sub-score in the overall quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub readability: f64,
    pub seo: f64,
    pub engagement: f64,
    pub structure: f64,
    pub factual: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            readability: 0.25,
            seo: 0.15,
            engagement: 0.25,
            structure: 0.20,
            factual: 0.15,
        }
    }
}

impl ScoringWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.readability + self.seo + self.engagement + self.structure + self.factual
    }

    /// Checks that no weight is negative and that the weights sum to 1.0.
    pub fn validate(&self) -> Result<(), QualityConfigError> {
        let weights = [
            ("readability", self.readability),
            ("seo", self.seo),
            ("engagement", self.engagement),
            ("structure", self.structure),
            ("factual", self.factual),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, w)| *w < 0.0 || !w.is_finite()) {
            return Err(QualityConfigError::Invalid(format!(
                "scoring weight '{name}' must be a non-negative number, got {value}"
            )));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(QualityConfigError::Invalid(format!(
                "scoring weights must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }
}

/// Quality scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Sub-score weights
    pub weights: ScoringWeights,
    /// Overall score below which the quality gate reports a (advisory) failure
    pub min_overall_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_overall_score: 60.0,
        }
    }
}

/// Variation differentiation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentiationConfig {
    /// Minimum required difference (1 - similarity) between any two variations
    pub min_difference: f64,
    /// Maximum number of single-variation regenerations per batch
    pub max_retries: u32,
    /// Vocabulary cap for the TF-IDF vectorizer
    pub max_features: usize,
    /// Longest n-gram included in the vocabulary
    pub ngram_max: usize,
}

impl Default for DifferentiationConfig {
    fn default() -> Self {
        Self {
            min_difference: 0.30,
            max_retries: 2,
            max_features: 1000,
            ngram_max: 2,
        }
    }
}

/// Settings for the generation calls made around the gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of stylistic variations produced per batch
    pub variation_count: usize,
    /// Temperature for variation generation
    pub variation_temperature: f32,
    /// Whether variation calls are dispatched concurrently
    pub parallel_variations: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            variation_count: 3,
            variation_temperature: 0.8,
            parallel_variations: true,
        }
    }
}

/// Errors that can occur when loading quality configuration.
#[derive(Debug, Error)]
pub enum QualityConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] ConfigError),

    /// An inline TOML document could not be parsed.
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration for all quality gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub scoring: ScoringConfig,
    pub differentiation: DifferentiationConfig,
    pub generation: GenerationConfig,
}

impl GateConfig {
    /// Load gate configuration from a file path.
    ///
    /// Values from the file can be overridden with environment variables
    /// using the `QUILLGATE` prefix and `__` as the nesting separator, e.g.
    /// `QUILLGATE__DIFFERENTIATION__MIN_DIFFERENCE=0.4`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file does not exist
    /// - The configuration file cannot be parsed
    /// - The path is invalid
    /// - The loaded values fail [`GateConfig::validate`]
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quillgate::quality::GateConfig;
    ///
    /// let config = GateConfig::load("config/quillgate.toml")?;
    /// # Ok::<(), quillgate::quality::QualityConfigError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, QualityConfigError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| QualityConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(QualityConfigError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(
                Environment::with_prefix("QUILLGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let gate_config: GateConfig = config.try_deserialize()?;
        gate_config.validate()?;

        tracing::debug!(path = path_str, "loaded gate configuration");
        Ok(gate_config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, QualityConfigError> {
        let gate_config: GateConfig = toml::from_str(toml_str)?;
        gate_config.validate()?;
        Ok(gate_config)
    }

    /// Checks semantic constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), QualityConfigError> {
        self.scoring.weights.validate()?;

        if !(0.0..=100.0).contains(&self.scoring.min_overall_score) {
            return Err(QualityConfigError::Invalid(format!(
                "min_overall_score must be within 0..=100, got {}",
                self.scoring.min_overall_score
            )));
        }
        if !(0.0..=1.0).contains(&self.differentiation.min_difference) {
            return Err(QualityConfigError::Invalid(format!(
                "min_difference must be within 0..=1, got {}",
                self.differentiation.min_difference
            )));
        }
        if self.differentiation.max_features == 0 {
            return Err(QualityConfigError::Invalid(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.differentiation.ngram_max == 0 {
            return Err(QualityConfigError::Invalid(
                "ngram_max must be at least 1".to_string(),
            ));
        }
        if self.generation.variation_count == 0 {
            return Err(QualityConfigError::Invalid(
                "variation_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
