use std::sync::Arc;

use crate::log_debug;
use crate::shared::errors::AppResult;

/// Score that forces outright rejection of a pair
pub const VETO: f32 = -1.0;

pub fn is_veto(score: f32) -> bool {
    score <= VETO
}

/// Scoring function over a (value, candidate) pair
///
/// Argument order is value-then-candidate; implementations need not be
/// symmetric. Scores live in [-1, 1], with [`VETO`] reserved for hard rejection.
pub trait SimilarityMetric<V, C>: Send + Sync {
    fn score(&self, value: &V, candidate: &C) -> f32;

    /// Name of this metric for logging/debugging
    fn name(&self) -> &str;
}

type ScoreFn<V, C> = dyn Fn(&V, &C) -> AppResult<f32> + Send + Sync;

/// Metric backed by a closure
pub struct FnMetric<V, C> {
    name: String,
    score_fn: Box<ScoreFn<V, C>>,
}

impl<V, C> SimilarityMetric<V, C> for FnMetric<V, C> {
    fn score(&self, value: &V, candidate: &C) -> f32 {
        match (self.score_fn)(value, candidate) {
            Ok(score) => score,
            Err(e) => {
                log_debug!("Metric {} failed, scoring 0: {}", self.name, e);
                0.0
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a similarity metric
///
/// Cloning is cheap. Every score read through the handle is sanitized: NaN and
/// infinities become a neutral 0.0 and anything below the veto is clamped to it.
pub struct Metric<V, C> {
    inner: Arc<dyn SimilarityMetric<V, C>>,
}

impl<V, C> Clone for Metric<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: 'static, C: 'static> Metric<V, C> {
    pub fn new<F>(name: impl Into<String>, score_fn: F) -> Self
    where
        F: Fn(&V, &C) -> f32 + Send + Sync + 'static,
    {
        Self::fallible(name, move |v, c| Ok(score_fn(v, c)))
    }

    /// Metric whose evaluation may fail; failures score a neutral 0.0
    pub fn fallible<F>(name: impl Into<String>, score_fn: F) -> Self
    where
        F: Fn(&V, &C) -> AppResult<f32> + Send + Sync + 'static,
    {
        Self::from_impl(FnMetric {
            name: name.into(),
            score_fn: Box::new(score_fn),
        })
    }

    pub fn from_impl(metric: impl SimilarityMetric<V, C> + 'static) -> Self {
        Self {
            inner: Arc::new(metric),
        }
    }
}

impl<V, C> Metric<V, C> {
    pub fn score(&self, value: &V, candidate: &C) -> f32 {
        let score = self.inner.score(value, candidate);
        if !score.is_finite() {
            log_debug!("Metric {} produced {}, scoring 0", self.inner.name(), score);
            return 0.0;
        }
        score.max(VETO)
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<V, C> std::fmt::Debug for Metric<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Metric").field(&self.inner.name()).finish()
    }
}
