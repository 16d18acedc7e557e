use serde::Serialize;

use crate::modules::similarity::Metric;

/// A committed (value, candidate) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<V, C> {
    pub value: V,
    pub candidate: C,
}

impl<V, C> Match<V, C> {
    pub fn new(value: V, candidate: C) -> Self {
        Self { value, candidate }
    }
}

/// Bar a pass score must clear before the pair may be committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acceptance {
    /// Discrete metrics: the score must equal this value
    Exact(f32),
    /// Fuzzy metrics: the score must reach this value
    AtLeast(f32),
}

impl Acceptance {
    pub fn accepts(&self, score: f32) -> bool {
        match *self {
            Acceptance::Exact(bar) => score == bar,
            Acceptance::AtLeast(bar) => score >= bar,
        }
    }
}

/// One matcher pass: a metric and the bar its scores must clear
pub struct MetricPass<V, C> {
    pub metric: Metric<V, C>,
    pub acceptance: Acceptance,
}

impl<V, C> Clone for MetricPass<V, C> {
    fn clone(&self) -> Self {
        Self {
            metric: self.metric.clone(),
            acceptance: self.acceptance,
        }
    }
}

impl<V, C> MetricPass<V, C> {
    pub fn new(metric: Metric<V, C>, acceptance: Acceptance) -> Self {
        Self { metric, acceptance }
    }

    pub fn exact(metric: Metric<V, C>) -> Self {
        Self::new(metric, Acceptance::Exact(1.0))
    }

    pub fn at_least(metric: Metric<V, C>, bar: f32) -> Self {
        Self::new(metric, Acceptance::AtLeast(bar))
    }
}

impl<V, C> std::fmt::Debug for MetricPass<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricPass")
            .field("metric", &self.metric.name())
            .field("acceptance", &self.acceptance)
            .finish()
    }
}
