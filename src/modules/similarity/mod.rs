/// Similarity metrics and the combinators that turn them into decision policies.
///
/// Metrics are values holding a scoring closure; `Cascade`, `Average` and `Min`
/// compose them. Domain libraries (`EpisodeMetrics`, `MovieMetrics`,
/// `TrackMetrics`) build the file-to-record metrics used by the matchers.
pub mod domain;

pub use domain::*;
