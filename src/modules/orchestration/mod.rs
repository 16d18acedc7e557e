/// Per-domain matching policies layered on the generic matcher
pub mod application;
pub mod domain;

pub use application::{AutoDetectMatcher, EpisodeListMatcher, MovieMatcher, Route, TrackMatcher};
pub use domain::{ClutterFilter, FileMatch, MatchOptions, MatchOutcome, MatchReport, MetricSequences};
