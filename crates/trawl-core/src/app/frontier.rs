//! Frontier - 次のレイヤーでダウンロードする URL の集まり

use std::sync::{Mutex, PoisonError};

use crate::domain::CrawlTarget;

/// Append-only while a layer runs; drained by the scheduler after the barrier.
#[derive(Default)]
pub struct Frontier {
    targets: Mutex<Vec<CrawlTarget>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, target: CrawlTarget) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target);
    }

    pub fn take(&self) -> Vec<CrawlTarget> {
        std::mem::take(&mut *self.targets.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
