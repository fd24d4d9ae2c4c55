use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cooperative stop flag shared between a caller and running crawls
///
/// The engine checks the flag before taking each target off the frontier and
/// races [`StopSignal::stopped`] against the pacing delay and each fetch, so a
/// raised signal ends the crawl without waiting for a slow server. Whatever
/// was aggregated so far is returned.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every crawl holding a clone of this signal to stop
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Completes once the signal has been raised
    pub async fn stopped(&self) {
        loop {
            // Created before the check so a concurrent `stop` is not missed
            let notified = self.inner.notify.notified();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}
