//! Crawler configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default size of both pools and of the per-host cap.
pub const DEFAULT_LIMIT: usize = 100;

/// Default backlog high-water mark of one host queue.
pub const DEFAULT_BACKLOG_LIMIT: usize = 1 << 14;

/// Sizes of the crawler's resource pools.
///
/// Missing fields fall back to the defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Fetch pool size.
    pub downloaders: usize,

    /// Extract pool size.
    pub extractors: usize,

    /// Concurrent fetches allowed against one host.
    pub per_host: usize,

    /// Queued jobs per host before submitters are suspended.
    pub backlog_limit: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            downloaders: DEFAULT_LIMIT,
            extractors: DEFAULT_LIMIT,
            per_host: DEFAULT_LIMIT,
            backlog_limit: DEFAULT_BACKLOG_LIMIT,
        }
    }
}

impl CrawlerConfig {
    pub fn new(downloaders: usize, extractors: usize, per_host: usize) -> Self {
        Self {
            downloaders,
            extractors,
            per_host,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.downloaders == 0 {
            return Err(ConfigError::ZeroDownloaders);
        }
        if self.extractors == 0 {
            return Err(ConfigError::ZeroExtractors);
        }
        if self.per_host == 0 {
            return Err(ConfigError::ZeroPerHost);
        }
        if self.backlog_limit == 0 {
            return Err(ConfigError::ZeroBacklogLimit);
        }
        Ok(())
    }
}
