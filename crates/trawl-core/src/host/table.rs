//! HostTable - ホスト名 → HostQueue の共有テーブル
//!
//! # 実装詳細
//! - `DashMap<String, Arc<HostQueue>>`。HostQueue は初回 submit 時に遅延生成
//! - submit はエントリ（shard ロック）を握ったまま `offer` する
//! - アイドルになった HostQueue は `remove_if` で「まだアイドルなら消す」
//!   どちらも shard → queue の順でロックを取るので、消した直後の submit は
//!   必ず新しい HostQueue を作る（同一ホストに 2 つのキューが並ぶことはない）

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use super::queue::{Admission, HostQueue};
use crate::error::CrawlError;
use crate::pool::{Job, WorkerPool};

/// Per-host admission in front of the shared fetch pool.
pub struct HostTable {
    queues: DashMap<String, Arc<HostQueue>>,
    pool: Arc<WorkerPool>,
    per_host: usize,
    backlog_limit: usize,
}

/// Holds one host slot for the lifetime of a dispatched job.
struct HostSlot {
    table: Arc<HostTable>,
    host: String,
    queue: Arc<HostQueue>,
}

impl Drop for HostSlot {
    fn drop(&mut self) {
        self.table.release(&self.host, &self.queue);
    }
}

impl HostTable {
    pub fn new(pool: Arc<WorkerPool>, per_host: usize, backlog_limit: usize) -> Self {
        Self {
            queues: DashMap::new(),
            pool,
            per_host,
            backlog_limit,
        }
    }

    /// Run `job` on the fetch pool once `host` has a free slot.
    ///
    /// Returns as soon as the job is dispatched or queued. Suspends only while the
    /// host backlog is at its high-water mark.
    pub async fn submit(self: &Arc<Self>, host: &str, job: Job) -> Result<(), CrawlError> {
        let mut job = job;
        loop {
            let (queue, admission) = {
                let entry = self
                    .queues
                    .entry(host.to_string())
                    .or_insert_with(|| Arc::new(HostQueue::new(self.per_host, self.backlog_limit)));
                let queue = Arc::clone(entry.value());
                let admission = queue.offer(job);
                (queue, admission)
            };

            match admission {
                Admission::Dispatch(job) => return self.dispatch(host, queue, job),
                Admission::Queued => {
                    trace!(host, "host busy, job queued");
                    return Ok(());
                }
                Admission::Full(returned) => {
                    // 閉じたプールの backlog はもう空かない
                    if self.pool.is_closed() {
                        return Err(CrawlError::AlreadyClosed);
                    }
                    debug!(host, limit = self.backlog_limit, "host backlog full, waiting");
                    job = returned;
                    queue.space_freed().await;
                }
            }
        }
    }

    fn dispatch(
        self: &Arc<Self>,
        host: &str,
        queue: Arc<HostQueue>,
        job: Job,
    ) -> Result<(), CrawlError> {
        let slot = HostSlot {
            table: Arc::clone(self),
            host: host.to_string(),
            queue,
        };
        self.pool.submit(Box::pin(async move {
            let _slot = slot;
            job.await;
        }))
    }

    fn release(self: &Arc<Self>, host: &str, queue: &Arc<HostQueue>) {
        if self.pool.is_closed() {
            let abandoned = queue.abandon_backlog();
            if !abandoned.is_empty() {
                warn!(host, count = abandoned.len(), "fetch pool closed, dropping queued jobs");
            }
        }

        match queue.finish() {
            Some(next) => {
                if let Err(e) = self.dispatch(host, Arc::clone(queue), next) {
                    warn!(host, "could not dispatch queued job: {e}");
                }
            }
            None => self.evict_if_idle(host, queue),
        }
    }

    fn evict_if_idle(&self, host: &str, queue: &Arc<HostQueue>) {
        let removed = self
            .queues
            .remove_if(host, |_, current| Arc::ptr_eq(current, queue) && current.is_idle());
        if removed.is_some() {
            trace!(host, "idle host queue evicted");
        }
    }

    /// Number of hosts with a live queue.
    pub fn active_hosts(&self) -> usize {
        self.queues.len()
    }

    pub fn queue(&self, host: &str) -> Option<Arc<HostQueue>> {
        self.queues.get(host).map(|entry| Arc::clone(entry.value()))
    }
}
