pub mod concurrency_calculator;

pub use concurrency_calculator::ConcurrencyCalculator;
