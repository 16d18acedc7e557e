pub mod match_pair;
pub mod matcher;

pub use match_pair::{Acceptance, Match, MetricPass};
pub use matcher::Matcher;
