use std::sync::Arc;

use crate::modules::media::{Candidate, MediaFile};
use crate::modules::similarity::domain::combinators::Min;
use crate::modules::similarity::domain::metric::{Metric, VETO};
use crate::modules::similarity::domain::name_similarity::{HybridSimilarity, NameSimilarity};
use crate::modules::similarity::domain::normalizer::NameNormalizer;
use crate::modules::similarity::domain::query_text::{split_name_and_year, NameWithYear};

use super::episode_metrics::FileMetric;

/// File-to-movie metrics built on the name and year found in file and folder names
#[derive(Clone)]
pub struct MovieMetrics {
    normalizer: Arc<NameNormalizer>,
    similarity: Arc<dyn NameSimilarity>,
}

impl MovieMetrics {
    pub fn new(similarity: Arc<dyn NameSimilarity>) -> Self {
        Self {
            normalizer: Arc::new(NameNormalizer::default_pipeline()),
            similarity,
        }
    }

    /// 1 on equal year, veto on disagreement, 0 when either side has none
    pub fn year(&self) -> FileMetric {
        Metric::new("Year", |file: &MediaFile, candidate: &Candidate| {
            let Some(movie) = candidate.as_movie() else {
                return 0.0;
            };
            match (file_name_and_year(file).year, movie.year) {
                (Some(a), Some(b)) if a == b => 1.0,
                (Some(_), Some(_)) => VETO,
                _ => 0.0,
            }
        })
    }

    /// Best similarity of the detected name against any of the movie's names
    pub fn name(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("MovieName", move |file: &MediaFile, candidate: &Candidate| {
            let Some(movie) = candidate.as_movie() else {
                return 0.0;
            };
            let query = this.normalizer.normalize(&file_name_and_year(file).name);
            movie
                .effective_names()
                .map(|name| this.similarity.calculate(&query, &this.normalizer.normalize(name)))
                .fold(0.0_f64, f64::max) as f32
        })
    }

    /// Strict check: names must agree and years must not contradict
    pub fn verification(&self) -> FileMetric {
        let year_agreement = Metric::new("YearAgreement", |file: &MediaFile, candidate: &Candidate| {
            let Some(movie) = candidate.as_movie() else {
                return 0.0;
            };
            match (file_name_and_year(file).year, movie.year) {
                (Some(a), Some(b)) if a != b => VETO,
                _ => 1.0,
            }
        });
        Min::of(vec![year_agreement, self.name()])
    }
}

impl Default for MovieMetrics {
    fn default() -> Self {
        Self::new(Arc::new(HybridSimilarity::default_hybrid()))
    }
}

/// Name and year from the file name, falling back to the folder when the file has no year
pub fn file_name_and_year(file: &MediaFile) -> NameWithYear {
    let from_file = split_name_and_year(file.base_name());
    if from_file.year.is_some() {
        return from_file;
    }

    match file.folder_name().map(split_name_and_year) {
        Some(from_folder) if from_folder.year.is_some() => from_folder,
        _ => from_file,
    }
}
