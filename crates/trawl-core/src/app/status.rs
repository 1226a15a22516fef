//! Status - クローラーの現在の状態（ログ・CLI 表示用）

use serde::Serialize;

/// Point-in-time view of a crawler instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlerStatus {
    pub downloaders: usize,
    pub extractors: usize,
    pub per_host: usize,
    /// Hosts with a live admission queue (busy or with a backlog).
    pub active_hosts: usize,
    pub closed: bool,
}
