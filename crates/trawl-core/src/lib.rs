//! trawl-core
//!
//! Breadth-first web crawler engine with a global and a per-host concurrency cap.
//!
//! # モジュール構成
//! - **domain**: CrawlTarget, CrawlFilter, Outcome, CrawlResult, URL 単位のエラー
//! - **ports**: Fetcher / Document（ネットワークと HTML パースは外側の責務）
//! - **ledger**: 重複排除と結果の台帳
//! - **host**: ホストごとの同時実行制限（HostQueue, HostTable）
//! - **pool**: ワーカープールとレイヤーバリア
//! - **app**: WebCrawler, CrawlerBuilder, LayerScheduler

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod ledger;
pub mod pool;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{CrawlerBuilder, CrawlerStatus, Interrupt, InterruptHandle, WebCrawler, interrupt_pair};
pub use config::CrawlerConfig;
pub use domain::{CrawlFilter, CrawlResult, CrawlSummary, CrawlTarget, ExtractionError, TransportError};
pub use error::{ConfigError, CrawlError};
pub use ports::{Document, Fetcher};
