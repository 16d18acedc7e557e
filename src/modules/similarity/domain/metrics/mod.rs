pub mod episode_metrics;
pub mod movie_metrics;
pub mod track_metrics;

pub use episode_metrics::{EpisodeMetrics, FileMetric};
pub use movie_metrics::{file_name_and_year, MovieMetrics};
pub use track_metrics::TrackMetrics;
