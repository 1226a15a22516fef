//! Host admission: per-host concurrency caps in front of the fetch pool.

pub mod queue;
pub mod table;

pub use self::queue::HostQueue;
pub use self::table::HostTable;
