//! Cancellable background tasks and request fencing
//!
//! Every view component that talks to the API follows the same pattern:
//! issue a [`Ticket`] from its [`RequestFence`], spawn the request, and on
//! completion apply the result only if the ticket is still current.

use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Handle to a spawned background task
#[derive(Debug)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    /// Spawn `fut` on the tokio runtime
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            abort: tokio::spawn(fut).abort_handle(),
        }
    }

    /// Stop the task. A no-op if it already finished.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Run `fut` after `delay`, unless the returned handle is cancelled first
pub fn debounce<F>(delay: Duration, fut: F) -> TaskHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    TaskHandle::spawn(async move {
        tokio::time::sleep(delay).await;
        fut.await;
    })
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Monotonic request counter. Only the latest ticket is current.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: u64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Supersede every outstanding ticket without issuing a new one
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    /// The most recently issued ticket
    pub fn current(&self) -> Ticket {
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fence_only_latest_is_current() {
        let mut fence = RequestFence::new();
        let first = fence.issue();
        assert!(fence.is_current(first));

        let second = fence.issue();
        assert!(!fence.is_current(first));
        assert!(fence.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_fence_invalidate() {
        let mut fence = RequestFence::new();
        let ticket = fence.issue();
        fence.invalidate();
        assert!(!fence.is_current(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = debounce(Duration::from_millis(300), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_debounce_never_runs() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = debounce(Duration::from_millis(300), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
