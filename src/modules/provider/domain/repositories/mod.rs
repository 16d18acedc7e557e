pub mod metadata_provider_repo;

pub use metadata_provider_repo::{
    EpisodeListProvider, MovieIdentificationService, MusicIdentificationService,
};
