/// Bounded, cancellable execution of per-batch tasks
pub mod application;
pub mod domain;

pub use application::ParallelDispatcher;
pub use domain::ConcurrencyCalculator;
