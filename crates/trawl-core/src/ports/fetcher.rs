//! Fetcher port - URL を Document に変える外部ケイパビリティ
//!
//! クローラー本体は I/O をしない。ネットワークと HTML パースはこの trait の実装側の責務。

use async_trait::async_trait;

use crate::domain::{ExtractionError, TransportError};

/// A downloaded document.
#[async_trait]
pub trait Document: Send + Sync {
    /// Outbound links of this document, as absolute URL strings.
    async fn extract_links(&self) -> Result<Vec<String>, ExtractionError>;
}

/// Downloads one URL.
///
/// Implementations must be cheap to share: the crawler keeps one `Arc<dyn Fetcher>`
/// and calls it from every fetch worker concurrently.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, TransportError>;
}
