//! Cancellation handles for subscriptions and in-flight work.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to stop a subscription or an in-flight operation.
///
/// Cancellation is synchronous: the teardown runs before `cancel` returns.
/// Calling `cancel` more than once is a no-op. Dropping the handle does
/// *not* cancel: whoever holds the handle owns the decision, and letting
/// it fall out of scope leaves the underlying work running.
#[derive(Clone)]
pub struct AnyCancelable {
    inner: Arc<CancelInner>,
}

struct CancelInner {
    canceled: AtomicBool,
    teardown: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl AnyCancelable {
    /// Wrap a teardown closure. The closure runs at most once.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                canceled: AtomicBool::new(false),
                teardown: Mutex::new(Some(Box::new(teardown))),
            }),
        }
    }

    /// A handle with nothing to tear down. `cancel` still flips
    /// `is_canceled`.
    pub fn empty() -> Self {
        Self::new(|| {})
    }

    /// Combine several handles into one; cancelling it cancels all parts
    /// in order.
    pub fn from_parts(parts: Vec<AnyCancelable>) -> Self {
        Self::new(move || {
            for part in &parts {
                part.cancel();
            }
        })
    }

    /// Run the teardown if it has not already run.
    pub fn cancel(&self) {
        if self.inner.canceled.swap(true, Ordering::SeqCst) {
            return;
        }
        let teardown = self.inner.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether `cancel` has been called.
    pub fn is_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for AnyCancelable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyCancelable")
            .field("canceled", &self.is_canceled())
            .finish()
    }
}
