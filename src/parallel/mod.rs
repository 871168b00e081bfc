pub mod pool;

pub use pool::{max_workers, WorkerPool};
