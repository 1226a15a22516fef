//! Pipeline - fetch ジョブと extract ジョブ
//!
//! # フロー
//! 1. fetch ジョブ: Fetcher::fetch → ledger を fetch の結果だけで確定
//! 2. 最終レイヤーでなく成功したら extract ジョブを extract プールに投げる
//! 3. extract ジョブ: リンクごとに filter → ledger.admit → frontier
//!
//! レイヤーバリアへの通知は `LatchGuard` の drop で 1 ユニット 1 回。
//! extract ジョブを投げたときは guard ごと渡す。
//!
//! クロールが中断されたら `cancel()`。まだ始まっていないジョブは何もせずに抜ける
//! （guard と host slot は drop で普通に返る）。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace, warn};

use super::frontier::Frontier;
use crate::domain::{CrawlFilter, CrawlTarget};
use crate::ledger::Ledger;
use crate::pool::{Job, LatchGuard, WorkerPool};
use crate::ports::{Document, Fetcher};

/// Everything the jobs of one crawl share.
pub struct CrawlContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub extract_pool: Arc<WorkerPool>,
    pub ledger: Ledger,
    pub frontier: Frontier,
    pub filter: CrawlFilter,
    cancelled: AtomicBool,
}

impl CrawlContext {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extract_pool: Arc<WorkerPool>,
        filter: CrawlFilter,
    ) -> Self {
        Self {
            fetcher,
            extract_pool,
            ledger: Ledger::new(),
            frontier: Frontier::new(),
            filter,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Make every job of this crawl that has not started yet a no-op.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Filter, then dedup. A target that gets through lands in the frontier.
    pub fn admit(&self, target: CrawlTarget) -> bool {
        if !self.filter.admits(&target) {
            return false;
        }
        if !self.ledger.admit(target.url()) {
            return false;
        }
        self.frontier.push(target);
        true
    }

    fn admit_link(&self, link: String) {
        match CrawlTarget::new(link) {
            Ok(target) => {
                self.admit(target);
            }
            Err(e) => debug!("skipping link: {e}"),
        }
    }
}

pub fn fetch_job(
    ctx: Arc<CrawlContext>,
    target: CrawlTarget,
    final_layer: bool,
    guard: LatchGuard,
) -> Job {
    Box::pin(async move {
        if ctx.is_cancelled() {
            trace!(url = target.url(), "crawl cancelled, skipping fetch");
            return;
        }
        let document = match ctx.fetcher.fetch(target.url()).await {
            Ok(document) => {
                ctx.ledger.resolve(target.url(), Ok(()));
                document
            }
            Err(e) => {
                debug!(url = target.url(), "fetch failed: {e}");
                ctx.ledger.resolve(target.url(), Err(e));
                return;
            }
        };
        debug!(url = target.url(), "fetched");

        if final_layer || ctx.is_cancelled() {
            return;
        }
        let job = extract_job(Arc::clone(&ctx), document, guard);
        if let Err(e) = ctx.extract_pool.submit(job) {
            warn!(url = target.url(), "could not schedule link extraction: {e}");
        }
    })
}

fn extract_job(ctx: Arc<CrawlContext>, document: Box<dyn Document>, guard: LatchGuard) -> Job {
    Box::pin(async move {
        let _guard = guard;
        if ctx.is_cancelled() {
            return;
        }
        match document.extract_links().await {
            Ok(links) => {
                for link in links {
                    if ctx.is_cancelled() {
                        break;
                    }
                    ctx.admit_link(link);
                }
            }
            // 抽出失敗はクロールの失敗ではない。次のリンクが見つからないだけ
            Err(e) => debug!("link extraction failed: {e}"),
        }
    })
}
