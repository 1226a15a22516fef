//! LayerScheduler - 幅優先のレイヤーループ
//!
//! # 状態遷移
//! - Seeding: seed を filter → ledger → frontier
//! - ProcessingLayer(d): frontier を全部 submit して、レイヤーバリアを待つ
//! - Aggregating: d == depth か、次の frontier が空になったら ledger を集計
//!
//! d の fetch と extract が全部終わるまで d+1 は 1 件も submit しない。
//! 中断されたら部分的な結果は返さずに `CrawlError::Interrupted`。
//! そのときは context を cancel して、残りのジョブを空振りさせる。

use std::sync::Arc;

use tracing::{debug, info};

use super::interrupt::Interrupt;
use super::pipeline::{self, CrawlContext};
use crate::domain::{CrawlResult, CrawlTarget};
use crate::error::CrawlError;
use crate::host::HostTable;
use crate::pool::Latch;

/// Drives one crawl invocation.
pub struct LayerScheduler {
    hosts: Arc<HostTable>,
    ctx: Arc<CrawlContext>,
    depth: usize,
    interrupt: Interrupt,
}

impl LayerScheduler {
    pub fn new(
        hosts: Arc<HostTable>,
        ctx: Arc<CrawlContext>,
        depth: usize,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            hosts,
            ctx,
            depth,
            interrupt,
        }
    }

    pub async fn run(mut self, seed: CrawlTarget) -> Result<CrawlResult, CrawlError> {
        if !self.ctx.admit(seed) {
            debug!("seed rejected by filter");
        }

        for layer in 0..=self.depth {
            let targets = self.ctx.frontier.take();
            if targets.is_empty() {
                break;
            }
            if let Err(e) = self.process_layer(layer, targets).await {
                // キューに残っているジョブはこのクロールの結果にならない
                self.ctx.cancel();
                info!(layer, "crawl aborted: {e}");
                return Err(e);
            }
        }

        let result = CrawlResult::from_ledger(self.ctx.ledger.drain());
        let summary = result.summary();
        info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            "crawl finished"
        );
        Ok(result)
    }

    async fn process_layer(
        &mut self,
        layer: usize,
        targets: Vec<CrawlTarget>,
    ) -> Result<(), CrawlError> {
        let final_layer = layer == self.depth;
        info!(layer, size = targets.len(), final_layer, "processing layer");

        let latch = Latch::new(targets.len());
        for target in targets {
            let host = target.host().to_string();
            let job = pipeline::fetch_job(Arc::clone(&self.ctx), target, final_layer, latch.guard());
            self.interrupt.guard(self.hosts.submit(&host, job)).await??;
        }

        self.interrupt.guard(latch.wait()).await?;
        debug!(layer, "layer barrier passed");
        Ok(())
    }
}
