pub mod parallel_dispatcher;

pub use parallel_dispatcher::ParallelDispatcher;
