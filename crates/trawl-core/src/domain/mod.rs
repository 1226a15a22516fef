//! Domain model (targets, filters, outcomes, results).

pub mod errors;
pub mod filter;
pub mod outcome;
pub mod result;
pub mod target;

pub use self::errors::{ExtractionError, TransportError};
pub use self::filter::CrawlFilter;
pub use self::outcome::Outcome;
pub use self::result::{CrawlResult, CrawlSummary};
pub use self::target::CrawlTarget;
