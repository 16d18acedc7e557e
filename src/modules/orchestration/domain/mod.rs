pub mod clutter;
pub mod match_options;
pub mod match_report;
pub mod metric_sequences;

pub use clutter::ClutterFilter;
pub use match_options::MatchOptions;
pub use match_report::{FileMatch, MatchOutcome, MatchReport};
pub use metric_sequences::{FilePass, MetricSequences, Verification};
