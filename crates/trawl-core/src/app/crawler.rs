//! WebCrawler - クローラーの公開 API
//!
//! ワーカープール 2 本（fetch / extract）とホストテーブルはインスタンスごとに 1 つで、
//! `close()` されるまで複数回の crawl で使い回す。ledger と frontier は crawl ごと。

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use super::builder::CrawlerBuilder;
use super::interrupt::Interrupt;
use super::pipeline::CrawlContext;
use super::scheduler::LayerScheduler;
use super::status::CrawlerStatus;
use crate::config::CrawlerConfig;
use crate::domain::{CrawlFilter, CrawlResult, CrawlTarget};
use crate::error::{ConfigError, CrawlError};
use crate::host::HostTable;
use crate::pool::WorkerPool;
use crate::ports::Fetcher;

/// Breadth-first crawler with a global and a per-host concurrency cap.
pub struct WebCrawler {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    fetch_pool: Arc<WorkerPool>,
    extract_pool: Arc<WorkerPool>,
    hosts: Arc<HostTable>,
    closed: AtomicBool,
}

impl WebCrawler {
    pub fn builder(fetcher: Arc<dyn Fetcher>) -> CrawlerBuilder {
        CrawlerBuilder::new(fetcher)
    }

    /// Shorthand for the builder with the three pool sizes.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        downloaders: usize,
        extractors: usize,
        per_host: usize,
    ) -> Result<Self, ConfigError> {
        CrawlerBuilder::new(fetcher)
            .config(CrawlerConfig::new(downloaders, extractors, per_host))
            .build()
    }

    pub(crate) fn start(fetcher: Arc<dyn Fetcher>, config: CrawlerConfig) -> Self {
        let fetch_pool = Arc::new(WorkerPool::spawn("fetch", config.downloaders));
        let extract_pool = Arc::new(WorkerPool::spawn("extract", config.extractors));
        let hosts = Arc::new(HostTable::new(
            Arc::clone(&fetch_pool),
            config.per_host,
            config.backlog_limit,
        ));
        info!(
            downloaders = config.downloaders,
            extractors = config.extractors,
            per_host = config.per_host,
            "crawler started"
        );
        Self {
            config,
            fetcher,
            fetch_pool,
            extract_pool,
            hosts,
            closed: AtomicBool::new(false),
        }
    }

    /// Crawl everything reachable from `seed` within `depth` link hops.
    pub async fn crawl(&self, seed: &str, depth: usize) -> Result<CrawlResult, CrawlError> {
        self.crawl_with(seed, depth, CrawlFilter::All).await
    }

    /// Skip every URL containing one of `excludes`.
    pub async fn crawl_excluding(
        &self,
        seed: &str,
        depth: usize,
        excludes: &HashSet<String>,
    ) -> Result<CrawlResult, CrawlError> {
        self.crawl_with(seed, depth, CrawlFilter::Exclude(excludes.clone()))
            .await
    }

    /// Only fetch URLs whose host is in `hosts`.
    pub async fn crawl_hosts(
        &self,
        seed: &str,
        depth: usize,
        hosts: &[String],
    ) -> Result<CrawlResult, CrawlError> {
        self.crawl_with(seed, depth, CrawlFilter::hosts(hosts.iter().cloned()))
            .await
    }

    pub async fn crawl_with(
        &self,
        seed: &str,
        depth: usize,
        filter: CrawlFilter,
    ) -> Result<CrawlResult, CrawlError> {
        self.crawl_interruptible(seed, depth, filter, Interrupt::never())
            .await
    }

    /// Like `crawl_with`, but gives up with `CrawlError::Interrupted` as soon as
    /// `interrupt` fires.
    pub async fn crawl_interruptible(
        &self,
        seed: &str,
        depth: usize,
        filter: CrawlFilter,
        interrupt: Interrupt,
    ) -> Result<CrawlResult, CrawlError> {
        if self.is_closed() {
            return Err(CrawlError::AlreadyClosed);
        }
        let seed = CrawlTarget::new(seed)?;
        info!(seed = %seed, depth, ?filter, "crawl started");

        let ctx = Arc::new(CrawlContext::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.extract_pool),
            filter,
        ));
        LayerScheduler::new(Arc::clone(&self.hosts), ctx, depth, interrupt)
            .run(seed)
            .await
    }

    /// Shut both pools down. Later crawls fail with `AlreadyClosed`.
    /// Safe to call more than once.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // fetch ジョブが extract ジョブを投げるので fetch 側を先に閉じる
        self.fetch_pool.close().await;
        self.extract_pool.close().await;
        info!("crawler closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn active_hosts(&self) -> usize {
        self.hosts.active_hosts()
    }

    pub fn status(&self) -> CrawlerStatus {
        CrawlerStatus {
            downloaders: self.config.downloaders,
            extractors: self.config.extractors,
            per_host: self.config.per_host,
            active_hosts: self.active_hosts(),
            closed: self.is_closed(),
        }
    }
}
