//! Single-fire readiness latch.

use tokio::sync::watch;

/// A value published at most once and observed by any number of waiters.
///
/// Waiting before the value is published suspends the task; every waiter,
/// early or late, sees the same value.
#[derive(Debug)]
pub struct ReadySignal<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> ReadySignal<T> {
    /// Create an unfired latch.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish the value. Returns `false` if it was already published, in
    /// which case the first value is kept.
    pub fn fire(&self, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    /// The published value, without waiting.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Wait until the value is published.
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(value) = current {
                return value;
            }
            // Sender dropped: the value can never arrive.
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl<T: Clone> Default for ReadySignal<T> {
    fn default() -> Self {
        Self::new()
    }
}
