/// Provider seams: metadata lookups are consumed through these traits
pub mod domain;
pub mod infrastructure;

pub use domain::{
    EpisodeListProvider, MovieIdentificationService, MusicIdentificationService, SearchResult,
    SortOrder,
};
pub use infrastructure::NfoReader;
