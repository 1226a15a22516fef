//! Outcome of one ledger entry.

use super::errors::TransportError;

/// State of a URL in the dedup ledger.
///
/// State transitions:
/// - Pending -> Succeeded
/// - Pending -> Failed
///
/// Terminal states never change again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Admitted to the crawl, fetch not finished yet.
    Pending,

    /// Fetched successfully.
    Succeeded,

    /// Fetch failed with a transport error.
    Failed(TransportError),
}

impl Outcome {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }
}

impl From<Result<(), TransportError>> for Outcome {
    fn from(result: Result<(), TransportError>) -> Self {
        match result {
            Ok(()) => Outcome::Succeeded,
            Err(e) => Outcome::Failed(e),
        }
    }
}
