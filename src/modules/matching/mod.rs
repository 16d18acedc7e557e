/// Generic multi-pass assignment of values to candidates
pub mod domain;

pub use domain::*;
