use crate::log_info;

const MIN_POOL_SIZE: usize = 1;
const MAX_POOL_SIZE: usize = 32;

/// Sizes the batch worker pool from system resources
pub struct ConcurrencyCalculator;

impl ConcurrencyCalculator {
    /// One worker per available CPU, clamped to a sane range
    pub fn preferred_pool_size() -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        let preferred = cpu_count.clamp(MIN_POOL_SIZE, MAX_POOL_SIZE);
        log_info!(
            "Calculated preferred concurrency: {} (CPUs: {})",
            preferred,
            cpu_count
        );
        preferred
    }

    /// Never more workers than tasks, never fewer than one
    ///
    /// A configured preference is taken as given; only the detected default is capped.
    pub fn pool_size(preferred: usize, task_count: usize) -> usize {
        preferred.min(task_count).max(MIN_POOL_SIZE)
    }
}
