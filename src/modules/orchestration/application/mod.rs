pub mod auto_detect_matcher;
pub mod episode_list_matcher;
pub mod movie_matcher;
pub mod track_matcher;

pub use auto_detect_matcher::{AutoDetectMatcher, Route};
pub use episode_list_matcher::EpisodeListMatcher;
pub use movie_matcher::MovieMatcher;
pub use track_matcher::TrackMatcher;
