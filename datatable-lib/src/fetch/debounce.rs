//! Trailing-edge debouncer.

use std::future::Future;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Coalesces rapid calls into one trailing invocation.
///
/// Each [`schedule`](Self::schedule) resets the deadline and replaces the
/// pending task; only the last task scheduled within a window runs, once the
/// window elapses without another call. Cancelling only removes a pending
/// deadline: a task whose deadline already fired runs to completion.
/// Dropping the debouncer cancels the pending deadline.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task` to run after the window, replacing any pending task.
    ///
    /// Needs a tokio runtime; without one the call is dropped with a warning.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::warn!("Debounced call dropped: no tokio runtime");
            return;
        };

        let token = CancellationToken::new();
        if let Some(previous) = self.lock_pending().replace(token.clone()) {
            previous.cancel();
        }

        let delay = self.delay;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => task.await,
            }
        });
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.lock_pending().take() {
            token.cancel();
        }
    }

    // The token in a poisoned slot is still valid.
    fn lock_pending(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
