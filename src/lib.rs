//! Similarity-cascade matching of local media files against remote metadata.
//!
//! Files are grouped into batches sharing one candidate fetch, matched by an
//! ordered list of similarity metrics, and merged back in input order. Ambiguity
//! is resolved by a memoized, single-flight disambiguation session.

pub mod modules;
pub mod shared;

pub use modules::derived::{is_derived, DerivedFilePropagator};
pub use modules::disambiguation::{
    Choice, ChoiceOption, Decision, DisambiguationPresenter, MatchSession, PresenterChannel,
    PresenterHandle,
};
pub use modules::dispatch::{ConcurrencyCalculator, ParallelDispatcher};
pub use modules::grouping::{detect_movie_query, detect_series_names, Batch, BatchPlanner};
pub use modules::matching::{Acceptance, Match, Matcher, MetricPass};
pub use modules::media::{Candidate, Episode, MediaClass, MediaFile, Movie, MoviePart, Track};
pub use modules::orchestration::{
    AutoDetectMatcher, EpisodeListMatcher, MatchOptions, MatchReport, MovieMatcher, TrackMatcher,
};
pub use modules::provider::{
    EpisodeListProvider, MovieIdentificationService, MusicIdentificationService, SearchResult,
    SortOrder,
};
pub use modules::similarity::{is_veto, Average, Cascade, Metric, Min, VETO};
pub use shared::errors::{AppError, AppResult};
pub use shared::utils::logger::init_logger;
pub use shared::{MatchConfig, MatchConfigBuilder};
