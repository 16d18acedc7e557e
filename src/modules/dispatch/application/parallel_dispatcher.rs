use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

use crate::modules::dispatch::domain::ConcurrencyCalculator;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_info};

/// Runs one task per batch on a bounded pool and merges results in input order
///
/// Cancelling the token drops every outstanding task and fails the whole
/// dispatch; no partial batch result is ever returned.
#[derive(Clone)]
pub struct ParallelDispatcher {
    concurrency: usize,
    token: CancellationToken,
}

impl ParallelDispatcher {
    pub fn new(concurrency: usize, token: CancellationToken) -> Self {
        Self { concurrency, token }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn dispatch<T, R, F, Fut>(&self, label: &str, tasks: Vec<T>, work: F) -> AppResult<Vec<R>>
    where
        F: Fn(usize, T) -> Fut,
        Fut: Future<Output = R>,
    {
        if self.token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let total = tasks.len();
        let pool = ConcurrencyCalculator::pool_size(self.concurrency, total);
        let completed = AtomicUsize::new(0);
        log_debug!("Dispatching {} {} tasks on {} workers", total, label, pool);

        let run = stream::iter(tasks.into_iter().enumerate().map(|(index, task)| {
            let future = work(index, task);
            let completed = &completed;
            async move {
                let result = future.await;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                LogContext::batch_progress(done, total, label);
                (index, result)
            }
        }))
        .buffer_unordered(pool)
        .collect::<Vec<_>>();

        let mut results = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                log_info!("Dispatch of {} {} tasks cancelled", total, label);
                return Err(AppError::Cancelled);
            }
            results = run => results,
        };

        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}
