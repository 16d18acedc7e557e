use std::sync::Arc;

use crate::modules::media::{Candidate, MediaFile};
use crate::modules::similarity::domain::combinators::Average;
use crate::modules::similarity::domain::metric::Metric;
use crate::modules::similarity::domain::name_similarity::{HybridSimilarity, NameSimilarity};
use crate::modules::similarity::domain::normalizer::NameNormalizer;

use super::episode_metrics::FileMetric;

/// Sanity checks for fingerprint-identified tracks against `Artist - Title` file names
#[derive(Clone)]
pub struct TrackMetrics {
    normalizer: Arc<NameNormalizer>,
    similarity: Arc<dyn NameSimilarity>,
}

impl TrackMetrics {
    pub fn new(similarity: Arc<dyn NameSimilarity>) -> Self {
        Self {
            normalizer: Arc::new(NameNormalizer::default_pipeline()),
            similarity,
        }
    }

    pub fn artist(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("Artist", move |file: &MediaFile, candidate: &Candidate| {
            let Some(track) = candidate.as_track() else {
                return 0.0;
            };
            let (artist, _) = this.split(file);
            this.compare(artist.unwrap_or(file.base_name()), &track.artist)
        })
    }

    pub fn title(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("TrackTitle", move |file: &MediaFile, candidate: &Candidate| {
            let Some(track) = candidate.as_track() else {
                return 0.0;
            };
            let (_, title) = this.split(file);
            this.compare(title, &track.title)
        })
    }

    pub fn verification(&self) -> FileMetric {
        Average::of(vec![self.artist(), self.title()])
    }

    /// `Artist - Title` when the name has a dash separator, otherwise the whole name as title
    fn split<'a>(&self, file: &'a MediaFile) -> (Option<&'a str>, &'a str) {
        let name = file.base_name();
        match name.split_once(" - ") {
            Some((artist, title)) => (Some(artist), title),
            None => (None, name),
        }
    }

    fn compare(&self, a: &str, b: &str) -> f32 {
        let a = self.normalizer.normalize(a);
        let b = self.normalizer.normalize(b);
        if a.contains(&b) && !b.is_empty() {
            return 1.0;
        }
        self.similarity.calculate(&a, &b) as f32
    }
}

impl Default for TrackMetrics {
    fn default() -> Self {
        Self::new(Arc::new(HybridSimilarity::default_hybrid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::media::Track;

    #[test]
    fn test_artist_title_split() {
        let metrics = TrackMetrics::default();
        let track = Candidate::track(Track::new("Daft Punk", "One More Time"));
        let file = MediaFile::new("/music/Daft Punk - One More Time.mp3");

        assert_eq!(metrics.verification().score(&file, &track), 1.0);
    }

    #[test]
    fn test_unrelated_track_scores_low() {
        let metrics = TrackMetrics::default();
        let track = Candidate::track(Track::new("Daft Punk", "One More Time"));
        let file = MediaFile::new("/music/Metallica - One.mp3");

        assert!(metrics.verification().score(&file, &track) < 0.7);
    }
}
