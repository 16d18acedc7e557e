pub mod batch;
pub mod query_detection;

pub use batch::{Batch, BatchKey};
pub use query_detection::{
    detect_folder_query, detect_movie_query, detect_series_name, detect_series_names,
    is_season_folder,
};
