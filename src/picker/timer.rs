//! Cancellable fire-once debounce timer

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A timer that runs a future once after a fixed delay
///
/// At most one timer is live: arming always cancels the previous one first.
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            handle: None,
        }
    }

    /// Schedule `on_fire` to run after the delay, replacing any pending timer
    pub fn arm<F>(&mut self, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire.await;
        }));
    }

    /// Cancel the pending timer
    ///
    /// Returns true if a timer was still waiting to fire.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// True while a timer is waiting to fire (or is firing)
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
