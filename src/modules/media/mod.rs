pub mod domain;

// Re-export commonly used types
pub use domain::{Candidate, Episode, MediaClass, MediaFile, Movie, MoviePart, Track};
