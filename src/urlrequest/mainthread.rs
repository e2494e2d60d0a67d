//! Owner-thread task queue.
//!
//! Notifications produced on the transport thread are posted here as boxed
//! closures that own their payload. The owner thread drains the queue and
//! runs each closure exactly once, in the order it was posted.

use tokio::sync::mpsc;

/// A unit of work bound for the owner thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Posting side of the owner-thread queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MainThread {
    tx: mpsc::UnboundedSender<Task>,
}

/// Receiving side of the owner-thread queue; lives on the owner thread.
pub struct MainThreadQueue {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl MainThread {
    /// Create a connected poster/queue pair.
    pub fn new() -> (MainThread, MainThreadQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (MainThread { tx }, MainThreadQueue { rx })
    }

    /// Schedule `task` on the owner thread. Never blocks.
    ///
    /// Returns `false` if the queue is gone, in which case the task and
    /// everything it owns is dropped on the calling thread.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(task)).is_err() {
            tracing::debug!("owner thread queue closed; dropping task");
            return false;
        }
        true
    }

    /// Whether the owner thread has stopped accepting tasks.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl MainThreadQueue {
    /// Run tasks until every `MainThread` handle has been dropped.
    /// Returns the number of tasks run.
    pub async fn run(mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.rx.recv().await {
            task();
            ran += 1;
        }
        ran
    }

    /// Run whatever is queued right now without waiting for more.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Blocking variant of [`run`](Self::run) for a plain OS thread.
    ///
    /// # Panics
    /// When called from inside an async runtime.
    pub fn blocking_run(mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.rx.blocking_recv() {
            task();
            ran += 1;
        }
        ran
    }
}
