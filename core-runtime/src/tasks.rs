//! # Background Execution
//!
//! Where the core's I/O runs and who owns it.
//!
//! - [`BackgroundContext`] wraps the Tokio runtime handle shared by the whole
//!   process. Repositories dispatch every network and storage call through it
//!   so the host's UI thread never blocks.
//! - [`TaskGroup`] owns the tasks a component starts. Dropping the group (or
//!   calling [`TaskGroup::cancel`]) cancels every task it spawned, including
//!   those of its child groups.
//!
//! ```ignore
//! let context = BackgroundContext::current()?;
//! let rows = context.run(async move { store.all().await }).await??;
//!
//! let group = TaskGroup::new(context.clone());
//! group.spawn(async move { /* observe something */ });
//! drop(group); // cancels the observer
//! ```

use crate::error::{Error, Result};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Buffer between a background stream producer and its consumer
const FORWARD_BUFFER: usize = 16;

/// Shared background runtime all I/O is dispatched to.
#[derive(Clone, Debug)]
pub struct BackgroundContext {
    handle: Handle,
}

impl BackgroundContext {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the Tokio runtime the caller is currently running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::CapabilityMissing {
                capability: "BackgroundContext".to_string(),
                message: format!(
                    "No Tokio runtime is running ({}). Start the core from within a runtime \
                     or pass an explicit runtime handle.",
                    e
                ),
            })
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run `future` on the background runtime and wait for its output.
    ///
    /// A panic inside the task is resumed on the awaiting side. If the runtime
    /// shuts down before the task finishes, [`Error::Cancelled`] is returned.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        match self.handle.spawn(future).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(Error::Cancelled),
        }
    }

    /// Spawn a detached task on the background runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }

    /// Drive `source` on the background runtime and hand its items to the
    /// returned stream.
    ///
    /// Dropping the returned stream unsubscribes: the producer task notices the
    /// closed channel and stops polling `source`.
    pub fn forward<S>(&self, source: S) -> BoxStream<'static, S::Item>
    where
        S: Stream + Send + 'static,
        S::Item: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(FORWARD_BUFFER);

        self.handle.spawn(async move {
            let mut source = Box::pin(source);
            loop {
                tokio::select! {
                    _ = tx.closed() => {
                        trace!("Forwarded stream dropped by consumer");
                        break;
                    }
                    item = source.next() => match item {
                        Some(item) => {
                            if tx.send(item).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
    }
}

/// Tasks owned by one component, cancelled together.
pub struct TaskGroup {
    context: BackgroundContext,
    token: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskGroup {
    pub fn new(context: BackgroundContext) -> Self {
        Self::with_token(context, CancellationToken::new())
    }

    fn with_token(context: BackgroundContext, token: CancellationToken) -> Self {
        Self {
            context,
            token,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// A group cancelled together with this one but droppable on its own.
    pub fn child(&self) -> TaskGroup {
        Self::with_token(self.context.clone(), self.token.child_token())
    }

    pub fn context(&self) -> &BackgroundContext {
        &self.context
    }

    /// Spawn `future` as part of this group.
    ///
    /// Spawning into a cancelled group is a no-op for the future: it is
    /// dropped without being polled to completion.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        let handle = self.context.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = future => {}
            }
        });

        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Cancel every task in this group and in its children.
    pub fn cancel(&self) {
        self.token.cancel();
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in handles.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of tasks that have not finished yet
    pub fn active_count(&self) -> usize {
        let handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("Task group dropped, cancelling owned tasks");
        }
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_current_context_inside_runtime() {
        assert!(BackgroundContext::current().is_ok());
    }

    #[test]
    fn test_current_context_outside_runtime() {
        let err = BackgroundContext::current().unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_returns_output() {
        let context = BackgroundContext::current().unwrap();
        let value = context.run(async { 21 * 2 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    #[should_panic(expected = "storage exploded")]
    async fn test_run_resumes_panics() {
        let context = BackgroundContext::current().unwrap();
        let _ = context
            .run(async {
                panic!("storage exploded");
            })
            .await;
    }

    #[tokio::test]
    async fn test_forward_delivers_items_in_order() {
        let context = BackgroundContext::current().unwrap();
        let items: Vec<i32> = context.forward(stream::iter(vec![1, 2, 3])).collect().await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_forward_stops_producer_when_consumer_drops() {
        let context = BackgroundContext::current().unwrap();
        let (done_tx, done_rx) = oneshot::channel::<()>();

        // A source that never yields; the producer must still exit.
        let source = stream::pending::<i32>().chain(stream::once(async move {
            drop(done_tx);
            0
        }));
        let forwarded = context.forward(source);
        drop(forwarded);

        // The sender inside the source is dropped when the producer task ends.
        let result = tokio::time::timeout(Duration::from_secs(1), done_rx).await;
        assert!(result.is_ok(), "producer should stop after consumer drop");
    }

    #[tokio::test]
    async fn test_task_group_cancels_on_drop() {
        let context = BackgroundContext::current().unwrap();
        let finished = Arc::new(AtomicBool::new(false));

        let group = TaskGroup::new(context);
        let flag = Arc::clone(&finished);
        group.spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(group.active_count(), 1);
        drop(group);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_child_group_cancelled_with_parent() {
        let context = BackgroundContext::current().unwrap();
        let parent = TaskGroup::new(context);
        let child = parent.child();

        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropping_child_leaves_parent_running() {
        let context = BackgroundContext::current().unwrap();
        let parent = TaskGroup::new(context);
        let child = parent.child();

        drop(child);
        assert!(!parent.is_cancelled());

        let (tx, rx) = oneshot::channel();
        parent.spawn(async move {
            let _ = tx.send(7);
        });
        assert_eq!(rx.await.unwrap(), 7);
    }
}
