//! Worker pools and the per-layer latch.

pub mod latch;
pub mod worker_pool;

pub use self::latch::{Latch, LatchGuard};
pub use self::worker_pool::{Job, WorkerPool};
