use super::metric::{is_veto, Metric, SimilarityMetric, VETO};

/// Evaluates metrics in order and returns the first decisive (non-zero) score
///
/// Cheap, coarse metrics go first; later metrics are never evaluated once a
/// verdict is reached. A veto is decisive like any other non-zero score.
pub struct Cascade<V, C> {
    metrics: Vec<Metric<V, C>>,
}

impl<V: 'static, C: 'static> Cascade<V, C> {
    pub fn of(metrics: Vec<Metric<V, C>>) -> Metric<V, C> {
        Metric::from_impl(Self { metrics })
    }
}

impl<V, C> SimilarityMetric<V, C> for Cascade<V, C> {
    fn score(&self, value: &V, candidate: &C) -> f32 {
        self.metrics
            .iter()
            .map(|metric| metric.score(value, candidate))
            .find(|score| *score != 0.0)
            .unwrap_or(0.0)
    }

    fn name(&self) -> &str {
        "Cascade"
    }
}

/// Arithmetic mean of the component scores; any veto vetoes the whole
pub struct Average<V, C> {
    metrics: Vec<Metric<V, C>>,
}

impl<V: 'static, C: 'static> Average<V, C> {
    pub fn of(metrics: Vec<Metric<V, C>>) -> Metric<V, C> {
        Metric::from_impl(Self { metrics })
    }
}

impl<V, C> SimilarityMetric<V, C> for Average<V, C> {
    fn score(&self, value: &V, candidate: &C) -> f32 {
        if self.metrics.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0;
        for metric in &self.metrics {
            let score = metric.score(value, candidate);
            if is_veto(score) {
                return VETO;
            }
            sum += score;
        }
        sum / self.metrics.len() as f32
    }

    fn name(&self) -> &str {
        "Average"
    }
}

/// Minimum of the component scores (all metrics must agree)
pub struct Min<V, C> {
    metrics: Vec<Metric<V, C>>,
}

impl<V: 'static, C: 'static> Min<V, C> {
    pub fn of(metrics: Vec<Metric<V, C>>) -> Metric<V, C> {
        Metric::from_impl(Self { metrics })
    }
}

impl<V, C> SimilarityMetric<V, C> for Min<V, C> {
    fn score(&self, value: &V, candidate: &C) -> f32 {
        let mut min: Option<f32> = None;
        for metric in &self.metrics {
            let score = metric.score(value, candidate);
            if is_veto(score) {
                return VETO;
            }
            min = Some(min.map_or(score, |m| m.min(score)));
        }
        min.unwrap_or(0.0)
    }

    fn name(&self) -> &str {
        "Min"
    }
}
