//! Live queries
//!
//! A [`ChangeTracker`] is a per-database invalidation counter. Writers call
//! [`ChangeTracker::notify`] after each committed write; [`live_query`]
//! re-runs its query whenever the counter moves.
//!
//! Guarantees of a live query stream:
//! - the first item is the query result at subscription time
//! - consecutive equal results are emitted once
//! - an `Err` item is the last item of the stream

use crate::Result;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Invalidation counter shared by a store and its live queries.
#[derive(Clone, Debug)]
pub struct ChangeTracker {
    version: Arc<watch::Sender<u64>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            version: Arc::new(tx),
        }
    }

    /// Record a committed write.
    pub fn notify(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}

struct LiveState<T, F> {
    changes: watch::Receiver<u64>,
    query: F,
    last: Option<T>,
    primed: bool,
    finished: bool,
}

/// Stream that runs `query` now and again after every change.
pub fn live_query<T, F, Fut>(tracker: &ChangeTracker, query: F) -> BoxStream<'static, Result<T>>
where
    T: PartialEq + Clone + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let state = LiveState {
        changes: tracker.subscribe(),
        query,
        last: None,
        primed: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            if state.primed && state.changes.changed().await.is_err() {
                return None;
            }
            state.primed = true;
            let _ = state.changes.borrow_and_update();

            match (state.query)().await {
                Ok(value) => {
                    if state.last.as_ref() == Some(&value) {
                        continue;
                    }
                    state.last = Some(value.clone());
                    return Some((Ok(value), state));
                }
                Err(err) => {
                    state.finished = true;
                    return Some((Err(err), state));
                }
            }
        }
    })
    .boxed()
}
