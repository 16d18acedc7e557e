/// Companion files inherit the match of their anchor media file
pub mod domain;

pub use domain::{is_derived, DerivedFilePropagator};
