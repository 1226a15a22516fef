//! Errors - ポートが返す URL 単位のエラー
//!
//! # 分類
//! - TransportError: fetch 失敗。CrawlResult.errors に記録され、クロールは続行
//! - ExtractionError: リンク抽出失敗。黙って捨てる（結果には出ない）

use serde::Serialize;
use thiserror::Error;

/// A fetch failed for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("failed to fetch {url}: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Link extraction failed for a fetched document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to extract links: {message}")]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
