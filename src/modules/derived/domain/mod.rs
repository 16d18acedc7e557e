pub mod propagator;

pub use propagator::{is_derived, DerivedFilePropagator};
