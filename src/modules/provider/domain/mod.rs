pub mod repositories;
pub mod value_objects;

pub use repositories::{EpisodeListProvider, MovieIdentificationService, MusicIdentificationService};
pub use value_objects::{SearchResult, SortOrder};
