//! WorkerPool - 固定本数のワーカーでジョブ（boxed future）を実行する
//!
//! # 実装詳細
//! - `mpsc::unbounded_channel` の receiver を全ワーカーで共有（`Arc<Mutex<_>>`）
//! - `close()` は sender を drop するだけ。キューに残ったジョブは全部実行されてから
//!   ワーカーが抜ける（drain してから join）
//! - ジョブの panic はワーカーを殺さない（`catch_unwind` でログだけ出す）

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::CrawlError;

/// A unit of work for a pool.
pub type Job = BoxFuture<'static, ()>;

type SharedReceiver = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Job>>>;

/// Fixed-size pool of tokio tasks.
///
/// Must be created inside a tokio runtime.
pub struct WorkerPool {
    name: &'static str,
    sender: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    joins: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `size` workers.
    pub fn spawn(name: &'static str, size: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver: SharedReceiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let mut joins = Vec::with_capacity(size);
        for worker_id in 0..size {
            let rx = Arc::clone(&receiver);
            joins.push(tokio::spawn(worker_loop(name, worker_id, rx)));
        }
        debug!(pool = name, size, "worker pool started");

        Self {
            name,
            sender: Mutex::new(Some(sender)),
            joins: tokio::sync::Mutex::new(joins),
        }
    }

    /// Queue a job. Fails once the pool is closed; the job is dropped in that case.
    pub fn submit(&self, job: Job) -> Result<(), CrawlError> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = sender.as_ref() else {
            return Err(CrawlError::AlreadyClosed);
        };
        sender.send(job).map_err(|_| CrawlError::AlreadyClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Stop accepting jobs, run what is already queued, then join every worker.
    /// Calling it again is a no-op.
    pub async fn close(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);

        let joins = std::mem::take(&mut *self.joins.lock().await);
        for join in joins {
            if let Err(e) = join.await {
                warn!(pool = self.name, "worker task ended abnormally: {e}");
            }
        }
    }
}

async fn worker_loop(name: &'static str, worker_id: usize, receiver: SharedReceiver) {
    loop {
        // recv の間だけロックを持つ。ジョブ実行中は他のワーカーが受け取れる
        let job = {
            let mut rx = receiver.lock().await;
            rx.recv().await
        };
        let Some(job) = job else {
            break;
        };

        if AssertUnwindSafe(job).catch_unwind().await.is_err() {
            error!(pool = name, worker_id, "job panicked");
        }
    }
    debug!(pool = name, worker_id, "worker stopped");
}
