//! Latch - レイヤー単位のカウントダウンバリア
//!
//! # 学習ポイント
//! - AtomicUsize + Notify で CountDownLatch 相当を作る
//! - `notified()` を先に作ってからカウンタを確認する（取りこぼし防止）
//! - `LatchGuard` の Drop で必ず 1 回だけ count_down する（panic 時も）

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::warn;

pub struct Latch {
    remaining: AtomicUsize,
    zero: Notify,
}

impl Latch {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(count),
            zero: Notify::new(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn count_down(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match previous {
            Ok(1) => self.zero.notify_waiters(),
            Ok(_) => {}
            Err(_) => warn!("latch counted down below zero"),
        }
    }

    /// Wait until the count reaches zero.
    pub async fn wait(&self) {
        loop {
            let notified = self.zero.notified();
            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// A token that counts down once when dropped.
    pub fn guard(self: &Arc<Self>) -> LatchGuard {
        LatchGuard {
            latch: Arc::clone(self),
        }
    }
}

/// Counts its latch down exactly once, on drop.
pub struct LatchGuard {
    latch: Arc<Latch>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
