pub mod entities;
pub mod value_objects;

pub use entities::{Candidate, Episode, MediaFile, Movie, MoviePart, Track};
pub use value_objects::MediaClass;
