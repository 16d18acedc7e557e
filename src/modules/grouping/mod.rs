/// Partitioning of input files into query-sharing batches
pub mod application;
pub mod domain;

pub use application::BatchPlanner;
pub use domain::{
    detect_folder_query, detect_movie_query, detect_series_name, detect_series_names,
    is_season_folder, Batch, BatchKey,
};
