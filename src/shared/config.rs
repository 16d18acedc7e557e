use crate::modules::dispatch::ConcurrencyCalculator;
use crate::shared::errors::{AppError, AppResult};

pub const ENV_THREADS: &str = "MEDIAMATCH_THREADS";
pub const ENV_PROBABLE_MATCH_THRESHOLD: &str = "MEDIAMATCH_PROBABLE_MATCH_THRESHOLD";
pub const ENV_CLUTTER_PATTERN: &str = "MEDIAMATCH_CLUTTER_PATTERN";

/// Configuration for a matching run
///
/// Externalizes the thresholds and limits used by the orchestration layer so
/// they can be tuned per deployment and pinned in tests.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Size of the worker pool used for batch dispatch
    pub preferred_concurrency: usize,

    /// Name similarity a single search result must reach to be auto-accepted
    pub probable_match_threshold: f32,

    /// Weight for Jaro-Winkler similarity (0.0 to 1.0)
    pub jaro_winkler_weight: f64,

    /// Weight for Levenshtein similarity (0.0 to 1.0)
    pub levenshtein_weight: f64,

    /// Queries shorter than this are considered undetectable
    pub min_query_length: usize,

    /// Anchor base names shorter than this never claim derived files
    pub min_derived_prefix_len: usize,

    /// Maximum number of files listed when asking the user for a query
    pub query_prompt_file_limit: usize,

    /// Regex matching sample/trailer/extras files that are never matched
    pub clutter_pattern: String,
}

impl MatchConfig {
    /// Creates a new configuration with production defaults
    pub fn new() -> Self {
        Self {
            preferred_concurrency: ConcurrencyCalculator::preferred_pool_size(),
            probable_match_threshold: 0.9,

            // Jaro-Winkler is better for names, so weight it higher
            jaro_winkler_weight: 0.7,
            levenshtein_weight: 0.3,

            min_query_length: 2,
            min_derived_prefix_len: 2,
            query_prompt_file_limit: 20,
            clutter_pattern: r"(?i)(^|[^a-z0-9])(sample|trailer|extras|featurettes?)([^a-z0-9]|$)"
                .to_string(),
        }
    }

    /// Creates a minimal configuration for testing
    pub fn minimal() -> Self {
        Self {
            preferred_concurrency: 2,
            ..Self::new()
        }
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(threads) = lookup(ENV_THREADS) {
            config.preferred_concurrency = threads.trim().parse::<usize>()?;
        }

        if let Some(threshold) = lookup(ENV_PROBABLE_MATCH_THRESHOLD) {
            config.probable_match_threshold = threshold.trim().parse::<f32>()?;
        }

        if let Some(pattern) = lookup(ENV_CLUTTER_PATTERN) {
            config.clutter_pattern = pattern;
        }

        config.validate().map_err(AppError::ConfigError)?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        let weight_sum = self.jaro_winkler_weight + self.levenshtein_weight;
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(format!(
                "Name similarity weights must sum to 1.0, got {}",
                weight_sum
            ));
        }

        if self.jaro_winkler_weight < 0.0 || self.levenshtein_weight < 0.0 {
            return Err("Name similarity weights must be non-negative".to_string());
        }

        if !(0.0..=1.0).contains(&self.probable_match_threshold) {
            return Err(format!(
                "probable_match_threshold must be between 0 and 1, got {}",
                self.probable_match_threshold
            ));
        }

        if self.preferred_concurrency == 0 {
            return Err("preferred_concurrency must be > 0".to_string());
        }

        if self.query_prompt_file_limit == 0 {
            return Err("query_prompt_file_limit must be > 0".to_string());
        }

        if let Err(e) = regex::Regex::new(&self.clutter_pattern) {
            return Err(format!("clutter_pattern is not a valid regex: {}", e));
        }

        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for MatchConfig to make test setup easier
#[derive(Default)]
pub struct MatchConfigBuilder {
    config: MatchConfig,
}

impl MatchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: MatchConfig::new(),
        }
    }

    pub fn preferred_concurrency(mut self, concurrency: usize) -> Self {
        self.config.preferred_concurrency = concurrency;
        self
    }

    pub fn probable_match_threshold(mut self, threshold: f32) -> Self {
        self.config.probable_match_threshold = threshold;
        self
    }

    pub fn jaro_winkler_weight(mut self, weight: f64) -> Self {
        self.config.jaro_winkler_weight = weight;
        self
    }

    pub fn levenshtein_weight(mut self, weight: f64) -> Self {
        self.config.levenshtein_weight = weight;
        self
    }

    pub fn min_query_length(mut self, length: usize) -> Self {
        self.config.min_query_length = length;
        self
    }

    pub fn min_derived_prefix_len(mut self, length: usize) -> Self {
        self.config.min_derived_prefix_len = length;
        self
    }

    pub fn clutter_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.clutter_pattern = pattern.into();
        self
    }

    pub fn build(self) -> Result<MatchConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
