//! HostQueue - 1 ホストあたりの同時 fetch 数を制限するゲート
//!
//! # 学習ポイント
//! - 1 キュー = 1 Mutex（ホストが違えば互いにブロックしない）
//! - backlog は FIFO（VecDeque）
//! - Notify は Mutex を離してから呼ぶ

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::pool::Job;

/// What `offer` decided for a job.
pub(crate) enum Admission {
    /// A slot was taken; the caller must dispatch the job now.
    Dispatch(Job),
    /// The job was appended to the backlog.
    Queued,
    /// The backlog is at its high-water mark; the job is handed back.
    Full(Job),
}

struct HostQueueState {
    in_use: usize,
    backlog: VecDeque<Job>,
}

/// Admission state of one host.
///
/// Invariant: `in_use <= capacity`, and the backlog is non-empty only while
/// every slot is taken.
pub struct HostQueue {
    capacity: usize,
    backlog_limit: usize,
    state: Mutex<HostQueueState>,
    space: Notify,
}

impl HostQueue {
    pub fn new(capacity: usize, backlog_limit: usize) -> Self {
        Self {
            capacity,
            backlog_limit,
            state: Mutex::new(HostQueueState {
                in_use: 0,
                backlog: VecDeque::new(),
            }),
            space: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostQueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn offer(&self, job: Job) -> Admission {
        let mut state = self.lock();
        if state.in_use < self.capacity {
            state.in_use += 1;
            Admission::Dispatch(job)
        } else if state.backlog.len() < self.backlog_limit {
            state.backlog.push_back(job);
            Admission::Queued
        } else {
            Admission::Full(job)
        }
    }

    /// Called once per finished job. Returns the next backlog job, which inherits
    /// the finished job's slot; otherwise the slot is freed.
    pub(crate) fn finish(&self) -> Option<Job> {
        let next = {
            let mut state = self.lock();
            match state.backlog.pop_front() {
                Some(job) => Some(job),
                None => {
                    state.in_use = state.in_use.saturating_sub(1);
                    None
                }
            }
        };
        if next.is_some() {
            // backlog に 1 つ空きができた。待っている submitter を 1 人だけ起こす
            self.space.notify_one();
        }
        next
    }

    /// Take the whole backlog out. Used when the fetch pool is gone.
    pub(crate) fn abandon_backlog(&self) -> Vec<Job> {
        let abandoned: Vec<Job> = self.lock().backlog.drain(..).collect();
        if !abandoned.is_empty() {
            self.space.notify_waiters();
            // Full を受け取ってまだ space_freed() に入っていない submitter 用の permit
            self.space.notify_one();
        }
        abandoned
    }

    /// Wait until a `finish` frees backlog space.
    pub(crate) async fn space_freed(&self) {
        self.space.notified().await;
    }

    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        state.in_use == 0 && state.backlog.is_empty()
    }

    pub fn in_use(&self) -> usize {
        self.lock().in_use
    }

    pub fn backlog_len(&self) -> usize {
        self.lock().backlog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn noop() -> Job {
        Box::pin(async {})
    }

    fn tagged(order: &Arc<Mutex<Vec<usize>>>, tag: usize) -> Job {
        let order = Arc::clone(order);
        Box::pin(async move {
            order.lock().unwrap().push(tag);
        })
    }

    #[test]
    fn dispatches_until_capacity_then_queues() {
        let queue = HostQueue::new(2, 10);
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Queued));
        assert_eq!(queue.in_use(), 2);
        assert_eq!(queue.backlog_len(), 1);
    }

    #[test]
    fn full_backlog_hands_the_job_back() {
        let queue = HostQueue::new(1, 1);
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Queued));
        assert!(matches!(queue.offer(noop()), Admission::Full(_)));
        assert_eq!(queue.backlog_len(), 1);
    }

    #[tokio::test]
    async fn finish_hands_slot_to_backlog_in_fifo_order() {
        let queue = HostQueue::new(1, 10);
        let order = Arc::new(Mutex::new(Vec::new()));

        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        for tag in 0..3 {
            assert!(matches!(queue.offer(tagged(&order, tag)), Admission::Queued));
        }

        while let Some(next) = queue.finish() {
            assert_eq!(queue.in_use(), 1);
            next.await;
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(queue.is_idle());
    }

    #[tokio::test]
    async fn finish_wakes_a_waiting_submitter() {
        let queue = Arc::new(HostQueue::new(1, 1));
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Queued));

        let woke = Arc::new(AtomicUsize::new(0));
        let waiter = tokio::spawn({
            let queue = Arc::clone(&queue);
            let woke = Arc::clone(&woke);
            async move {
                queue.space_freed().await;
                woke.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(woke.load(Ordering::SeqCst), 0);

        assert!(queue.finish().is_some());
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(woke.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abandon_backlog_wakes_a_submitter_that_arrives_late() {
        let queue = HostQueue::new(1, 1);
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Queued));
        assert!(matches!(queue.offer(noop()), Admission::Full(_)));

        // space_freed() を呼ぶ前に backlog が捨てられる
        assert_eq!(queue.abandon_backlog().len(), 1);

        tokio::time::timeout(Duration::from_secs(1), queue.space_freed())
            .await
            .unwrap();
    }

    #[test]
    fn abandon_backlog_empties_the_queue() {
        let queue = HostQueue::new(1, 10);
        assert!(matches!(queue.offer(noop()), Admission::Dispatch(_)));
        assert!(matches!(queue.offer(noop()), Admission::Queued));
        assert!(matches!(queue.offer(noop()), Admission::Queued));

        assert_eq!(queue.abandon_backlog().len(), 2);
        assert!(queue.finish().is_none());
        assert!(queue.is_idle());
    }
}
