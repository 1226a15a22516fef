//! Interrupt - 実行中のクロールを外から止めるためのシグナル
//!
//! `watch::channel(false)` を使う（WorkerGroup の shutdown と同じ形）。
//! 発火すると、バックログ待ちの submit とレイヤーバリア待ちがどちらも抜けて
//! クロールは `CrawlError::Interrupted` で終わる。部分的な結果は返さない。

use std::future::Future;

use tokio::sync::watch;

use crate::error::CrawlError;

/// Raises the interrupt for every `Interrupt` cloned from the same pair.
pub struct InterruptHandle {
    tx: watch::Sender<bool>,
}

impl InterruptHandle {
    pub fn interrupt(&self) {
        // receiver が全部 drop 済みなら誰も待っていないので無視してよい
        let _ = self.tx.send(true);
    }
}

/// Receiving side, passed to `WebCrawler::crawl_interruptible`.
#[derive(Clone)]
pub struct Interrupt {
    rx: Option<watch::Receiver<bool>>,
}

pub fn interrupt_pair() -> (InterruptHandle, Interrupt) {
    let (tx, rx) = watch::channel(false);
    (InterruptHandle { tx }, Interrupt { rx: Some(rx) })
}

impl Interrupt {
    /// An interrupt that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_raised(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    async fn raised(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // handle が発火せずに drop された
                return std::future::pending().await;
            }
        }
    }

    /// Run `fut` unless the interrupt fires first.
    pub async fn guard<F: Future>(&mut self, fut: F) -> Result<F::Output, CrawlError> {
        tokio::select! {
            biased;
            _ = self.raised() => Err(CrawlError::Interrupted),
            out = fut => Ok(out),
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::never()
    }
}
