pub mod batch_planner;

pub use batch_planner::BatchPlanner;
