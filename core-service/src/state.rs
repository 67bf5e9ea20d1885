//! Observable screen state
//!
//! A [`StateHolder`] keeps the latest value of one screen's UI state. The
//! owning controller is the only writer; any number of readers hold a
//! `watch::Receiver` and drop it to unsubscribe.

use std::sync::Arc;
use tokio::sync::watch;

pub struct StateHolder<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for StateHolder<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the whole value and notify readers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify in place. Readers are notified only when `modify` returns true.
    pub fn update_if(&self, modify: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(modify)
    }
}
