use std::future::Future;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

/// Runs the callback's background work on a tokio runtime and keeps track of it,
/// so owners can wait for in-flight units or shut the pool down cleanly.
#[derive(Clone)]
pub struct Dispatcher {
    handle: Handle,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(handle: Handle) -> Self {
        Self { handle, tracker: TaskTracker::new() }
    }

    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn_on(fut, &self.handle);
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits for every unit spawned so far, including units they spawn while we wait.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Waits for in-flight work and leaves the tracker closed.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        tracing::debug!("download dispatcher shut down");
    }
}
