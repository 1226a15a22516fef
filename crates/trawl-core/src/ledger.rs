//! Ledger - クロール中に見た URL とその結果の台帳
//!
//! # 実装詳細
//! - `HashMap<String, usize>` で URL → entries の位置を引く
//! - `Vec<(String, Outcome)>` が挿入順を保持（結果の並びを安定させるため）
//! - 1 つの Mutex で排他制御。ロックを握ったまま await しない

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::domain::{Outcome, TransportError};

#[derive(Default)]
struct LedgerState {
    index: HashMap<String, usize>,
    entries: Vec<(String, Outcome)>,
}

/// Dedup table shared by every job of one crawl.
///
/// A URL is inserted at most once and never removed.
#[derive(Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `url` as `Pending` if absent. Returns `true` for the first caller only.
    pub fn admit(&self, url: &str) -> bool {
        let mut state = self.lock();
        if state.index.contains_key(url) {
            return false;
        }
        let position = state.entries.len();
        state.index.insert(url.to_string(), position);
        state.entries.push((url.to_string(), Outcome::Pending));
        true
    }

    /// Move a pending entry to its terminal outcome.
    pub fn resolve(&self, url: &str, result: Result<(), TransportError>) {
        let mut state = self.lock();
        let Some(&position) = state.index.get(url) else {
            warn!(url, "resolve called for a url that was never admitted");
            return;
        };
        let outcome = &mut state.entries[position].1;
        if outcome.is_terminal() {
            warn!(url, "url already resolved, keeping first outcome");
            return;
        }
        *outcome = Outcome::from(result);
    }

    pub fn outcome(&self, url: &str) -> Option<Outcome> {
        let state = self.lock();
        state
            .index
            .get(url)
            .map(|&position| state.entries[position].1.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every entry out in insertion order, leaving the ledger empty.
    pub fn drain(&self) -> Vec<(String, Outcome)> {
        let mut state = self.lock();
        state.index.clear();
        std::mem::take(&mut state.entries)
    }
}
