use thiserror::Error;

/// ConfigError はクローラー構築時の検証エラー
///
/// `CrawlerBuilder::build()` が返す。ワーカーを 1 本も起動する前に失敗する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("downloaders must be positive")]
    ZeroDownloaders,

    #[error("extractors must be positive")]
    ZeroExtractors,

    #[error("per_host must be positive")]
    ZeroPerHost,

    #[error("backlog_limit must be positive")]
    ZeroBacklogLimit,
}

/// Crawl-level failure. Per-URL transport errors never show up here; they are
/// recorded in the `CrawlResult` instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("crawler is already closed")]
    AlreadyClosed,

    #[error("crawl was interrupted")]
    Interrupted,
}
