pub mod candidate;
pub mod episode;
pub mod media_file;
pub mod movie;
pub mod track;

pub use candidate::Candidate;
pub use episode::Episode;
pub use media_file::MediaFile;
pub use movie::{Movie, MoviePart};
pub use track::Track;
