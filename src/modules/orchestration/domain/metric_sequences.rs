use std::sync::Arc;

use crate::modules::matching::MetricPass;
use crate::modules::media::{Candidate, MediaFile};
use crate::modules::similarity::{
    is_veto, EpisodeMetrics, FileMetric, MovieMetrics, NameSimilarity, TrackMetrics,
};

pub type FilePass = MetricPass<MediaFile, Candidate>;

/// Independent check a committed strict-mode match has to pass
#[derive(Clone)]
pub struct Verification {
    metric: FileMetric,
    bar: f32,
}

impl Verification {
    pub fn new(metric: FileMetric, bar: f32) -> Self {
        Self { metric, bar }
    }

    /// Scores strictly above the bar are accepted, vetoes never are
    pub fn accepts(&self, file: &MediaFile, candidate: &Candidate) -> bool {
        let score = self.metric.score(file, candidate);
        !is_veto(score) && score > self.bar
    }

    pub fn name(&self) -> &str {
        self.metric.name()
    }
}

/// The ordered metric passes and verifications used by each matcher
pub struct MetricSequences;

impl MetricSequences {
    /// Coarse identifier passes first, fuzzy name and path passes last
    pub fn episodes(similarity: Arc<dyn NameSimilarity>, strict: bool) -> Vec<FilePass> {
        let metrics = if strict {
            EpisodeMetrics::strict(similarity)
        } else {
            EpisodeMetrics::new(similarity)
        };

        let mut passes = vec![
            FilePass::exact(metrics.episode_funnel()),
            FilePass::at_least(metrics.episode_balancer(), 0.1),
            FilePass::exact(metrics.air_date()),
            FilePass::at_least(metrics.substring_fields(), 0.66),
            FilePass::at_least(metrics.series_name(), 0.5),
            FilePass::at_least(metrics.special_number(), 0.5),
        ];
        if !strict {
            passes.push(FilePass::at_least(metrics.numeric(), 0.5));
            passes.push(FilePass::at_least(metrics.file_path(), 0.5));
        }
        passes
    }

    pub fn episode_verification(similarity: Arc<dyn NameSimilarity>) -> Verification {
        Verification::new(EpisodeMetrics::strict(similarity).verification(), 0.0)
    }

    pub fn movie_verification(similarity: Arc<dyn NameSimilarity>) -> Verification {
        Verification::new(MovieMetrics::new(similarity).verification(), 0.5)
    }

    pub fn track_verification(similarity: Arc<dyn NameSimilarity>) -> Verification {
        Verification::new(TrackMetrics::new(similarity).verification(), 0.5)
    }
}
