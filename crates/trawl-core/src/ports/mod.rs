//! Ports - 外部コラボレーターとの境界
//!
//! クローラーが消費する唯一のポートは `Fetcher`（とそれが返す `Document`）。
//! HTTP 実装は trawl-cli 側、テスト用のインメモリ実装は `testing` モジュールにある。

pub mod fetcher;

pub use self::fetcher::{Document, Fetcher};
