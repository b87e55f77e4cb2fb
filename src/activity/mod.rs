//! Activity tracking
//!
//! Counts in-flight requests so a busy indicator can be driven from it.
//! Every increment is owned by an [`ActivityGuard`]; dropping the guard
//! decrements, so the count cannot go negative and returns to zero once all
//! tracked work has finished, failed or been cancelled.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

/// Shared in-flight request counter
#[derive(Clone)]
pub struct ActivityCounter {
    count: Arc<watch::Sender<usize>>,
}

impl ActivityCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            count: Arc::new(tx),
        }
    }

    /// Current number of in-flight requests
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Check if any request is in flight
    pub fn is_active(&self) -> bool {
        self.count() > 0
    }

    /// Subscribe to count changes
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    /// Register one in-flight request until the guard is dropped
    pub fn track(&self) -> ActivityGuard {
        self.count.send_modify(|count| *count += 1);
        trace!(count = self.count(), "Activity started");
        ActivityGuard {
            counter: self.clone(),
        }
    }

    /// Run `future` while holding a guard
    pub async fn track_future<F: Future>(&self, future: F) -> F::Output {
        let _guard = self.track();
        future.await
    }

    /// Wait until no request is in flight
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    fn release(&self) {
        self.count
            .send_modify(|count| *count = count.saturating_sub(1));
        trace!(count = self.count(), "Activity finished");
    }
}

impl Default for ActivityCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActivityCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityCounter")
            .field("count", &self.count())
            .finish()
    }
}

/// Holds one unit of activity; released on drop
#[must_use = "activity is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ActivityGuard {
    counter: ActivityCounter,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.counter.release();
    }
}

#[cfg(test)]
mod activity_tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::time::Duration;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = ActivityCounter::new();
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_active());
    }

    #[test]
    fn test_guards_increment_and_release() {
        let counter = ActivityCounter::new();

        let first = counter.track();
        let second = counter.clone().track();
        assert_eq!(counter.count(), 2);
        assert!(counter.is_active());

        drop(first);
        assert_eq!(counter.count(), 1);
        drop(second);
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_track_future_releases_on_failure() {
        let counter = ActivityCounter::new();

        let result: Result<()> = counter
            .track_future(async { Err(Error::fetch("offline")) })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_aborted_task_releases() {
        let counter = ActivityCounter::new();
        let task_counter = counter.clone();

        let handle = tokio::spawn(async move {
            task_counter
                .track_future(tokio::time::sleep(Duration::from_secs(60)))
                .await;
        });

        tokio::task::yield_now().await;
        while counter.count() == 0 {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;

        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_subscribe_and_wait_idle() {
        let counter = ActivityCounter::new();
        let mut rx = counter.subscribe();

        let guard = counter.track();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        let waiter = {
            let counter = counter.clone();
            tokio::spawn(async move { counter.wait_idle().await })
        };
        drop(guard);

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counter.count(), 0);
    }
}
