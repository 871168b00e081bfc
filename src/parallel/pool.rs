//! Rayon thread pool configuration for the trial search.
//!
//! Use [WorkerPool::install] to run the search with a fixed number of threads, or rely on
//! Rayon's default (all CPU cores).

use std::num::NonZeroUsize;
use std::thread;

use rayon::ThreadPoolBuilder;

/// Most worker threads a pool will start: the parallelism the OS reports for this process.
pub fn max_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Configures how many worker threads build and score trials.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus). Larger requests are
    /// capped at [max_workers].
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Threads the search will actually use.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers.min(max_workers())
        }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers) is 0,
    /// uses the global Rayon pool (all cores). Otherwise builds a temporary pool with that many
    /// threads, falling back to the global pool if the threads cannot be spawned.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        let workers = self.effective_workers();
        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(workers, %err, "falling back to global rayon pool");
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use super::{max_workers, WorkerPool};

    #[test]
    fn fixed_pool_runs_closure_with_requested_threads() {
        let pool = WorkerPool::with_workers(2);
        let threads = pool.install(rayon::current_num_threads);
        assert_eq!(threads, 2.min(max_workers()));
        assert_eq!(pool.effective_workers(), threads);
    }

    #[test]
    fn oversized_requests_are_capped_at_available_parallelism() {
        let pool = WorkerPool::with_workers(100_000);
        assert_eq!(pool.effective_workers(), max_workers());
        assert_eq!(pool.install(rayon::current_num_threads), max_workers());
    }

    #[test]
    fn default_pool_uses_global_threads() {
        let pool = WorkerPool::default();
        let sum: u64 = pool.install(|| (1..=100u64).into_par_iter().sum());
        assert_eq!(sum, 5050);
        assert!(pool.effective_workers() >= 1);
    }
}
