//! App - クローラーのアプリケーション層
//!
//! # 主要コンポーネント
//! - **CrawlerBuilder**: 設定の検証とワイヤリング
//! - **WebCrawler**: 公開 API（crawl / close）
//! - **LayerScheduler**: レイヤーごとの submit とバリア待ち
//! - **pipeline**: fetch ジョブと extract ジョブ
//! - **Interrupt**: 実行中のクロールの中断

pub mod builder;
pub mod crawler;
pub mod frontier;
pub mod interrupt;
pub mod pipeline;
pub mod scheduler;
pub mod status;

pub use self::builder::CrawlerBuilder;
pub use self::crawler::WebCrawler;
pub use self::interrupt::{Interrupt, InterruptHandle, interrupt_pair};
pub use self::status::CrawlerStatus;
