//! CrawlerBuilder - WebCrawler の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に設定を検証し、不正ならプールを起動する前に ConfigError を返す

use std::sync::Arc;

use super::crawler::WebCrawler;
use crate::config::CrawlerConfig;
use crate::error::ConfigError;
use crate::ports::Fetcher;

/// Builds a [`WebCrawler`].
///
/// # 使用例
/// ```ignore
/// let crawler = CrawlerBuilder::new(Arc::new(MyFetcher))
///     .downloaders(8)
///     .extractors(4)
///     .per_host(2)
///     .build()?;
/// ```
pub struct CrawlerBuilder {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlerConfig,
}

impl CrawlerBuilder {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            config: CrawlerConfig::default(),
        }
    }

    pub fn config(mut self, config: CrawlerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn downloaders(mut self, n: usize) -> Self {
        self.config.downloaders = n;
        self
    }

    pub fn extractors(mut self, n: usize) -> Self {
        self.config.extractors = n;
        self
    }

    pub fn per_host(mut self, n: usize) -> Self {
        self.config.per_host = n;
        self
    }

    pub fn backlog_limit(mut self, n: usize) -> Self {
        self.config.backlog_limit = n;
        self
    }

    /// Validate and start the worker pools. Must run inside a tokio runtime.
    pub fn build(self) -> Result<WebCrawler, ConfigError> {
        self.config.validate()?;
        Ok(WebCrawler::start(self.fetcher, self.config))
    }
}
