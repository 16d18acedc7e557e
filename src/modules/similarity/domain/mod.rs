pub mod combinators;
pub mod date_parser;
pub mod metric;
pub mod metrics;
pub mod name_similarity;
pub mod normalizer;
pub mod query_text;
pub mod season_episode;

pub use combinators::{Average, Cascade, Min};
pub use date_parser::DateParser;
pub use metric::{is_veto, FnMetric, Metric, SimilarityMetric, VETO};
pub use metrics::{EpisodeMetrics, FileMetric, MovieMetrics, TrackMetrics};
pub use name_similarity::{
    HybridSimilarity, JaroWinklerSimilarity, LevenshteinSimilarity, NameSimilarity,
};
pub use normalizer::{NameNormalizer, NameTransformation};
pub use query_text::{clean_query, split_name_and_year, NameWithYear};
pub use season_episode::{text_before_identifier, SeasonEpisodeParser, SxE};
