use strsim::{jaro_winkler, normalized_levenshtein};

use crate::shared::config::MatchConfig;
use crate::shared::errors::{AppError, AppResult};

/// Strategy for calculating similarity between two names
///
/// Callers normalize both sides first; strategies compare the strings as given.
pub trait NameSimilarity: Send + Sync {
    /// Returns a value between 0.0 (completely different) and 1.0 (identical)
    fn calculate(&self, a: &str, b: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Gives more weight to matching prefixes, which suits titles and names
#[derive(Debug, Clone)]
pub struct JaroWinklerSimilarity;

impl NameSimilarity for JaroWinklerSimilarity {
    fn calculate(&self, a: &str, b: &str) -> f64 {
        jaro_winkler(a, b)
    }

    fn name(&self) -> &'static str {
        "JaroWinkler"
    }
}

/// Normalized edit distance, good at character-level differences
#[derive(Debug, Clone)]
pub struct LevenshteinSimilarity;

impl NameSimilarity for LevenshteinSimilarity {
    fn calculate(&self, a: &str, b: &str) -> f64 {
        normalized_levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "Levenshtein"
    }
}

/// Weighted average of several strategies
pub struct HybridSimilarity {
    strategies: Vec<(Box<dyn NameSimilarity>, f64)>,
}

impl HybridSimilarity {
    /// Weights must sum to 1.0
    pub fn new(strategies: Vec<(Box<dyn NameSimilarity>, f64)>) -> AppResult<Self> {
        let weight_sum: f64 = strategies.iter().map(|(_, w)| w).sum();
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(AppError::ValidationError(format!(
                "Strategy weights must sum to 1.0, got {}",
                weight_sum
            )));
        }
        Ok(Self { strategies })
    }

    /// Jaro-Winkler (70%) + Levenshtein (30%)
    pub fn default_hybrid() -> Self {
        Self {
            strategies: vec![
                (Box::new(JaroWinklerSimilarity), 0.7),
                (Box::new(LevenshteinSimilarity), 0.3),
            ],
        }
    }

    pub fn from_config(config: &MatchConfig) -> AppResult<Self> {
        Self::new(vec![
            (Box::new(JaroWinklerSimilarity), config.jaro_winkler_weight),
            (Box::new(LevenshteinSimilarity), config.levenshtein_weight),
        ])
    }
}

impl Default for HybridSimilarity {
    fn default() -> Self {
        Self::default_hybrid()
    }
}

impl NameSimilarity for HybridSimilarity {
    fn calculate(&self, a: &str, b: &str) -> f64 {
        self.strategies
            .iter()
            .map(|(strategy, weight)| strategy.calculate(a, b) * weight)
            .sum()
    }

    fn name(&self) -> &'static str {
        "Hybrid"
    }
}
