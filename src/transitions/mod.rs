//! Viewport transitions: strategies for getting from the currently
//! displayed camera to the stream a target state produces.

use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use parking_lot::Mutex;
use std::sync::Arc;

mod default;
mod ease;
mod empty;
mod fly;
mod immediate;

pub use default::{DefaultViewportTransition, DefaultViewportTransitionOptions};
pub use ease::{EaseToViewportTransition, EaseToViewportTransitionOptions};
pub use empty::EmptyViewportTransition;
pub use fly::{FlyToViewportTransition, FlyToViewportTransitionOptions};
pub use immediate::ImmediateViewportTransition;

/// Completion callback for a transition run. Receives `true` when the
/// animation reached its target, `false` when cancelled or superseded.
pub type TransitionCompletion = Box<dyn FnOnce(bool) + Send>;

/// A strategy for animating toward the camera stream of a target state.
///
/// Implementations subscribe to `to`'s camera stream and drive the
/// external animation facility toward it. The completion fires exactly
/// once, including when the run is cancelled before `to` has emitted its
/// first value.
pub trait ViewportTransition: Send + Sync {
    fn run(
        &self,
        from: Option<&Arc<dyn ViewportState>>,
        to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable;
}

/// Guards a transition completion so it fires at most once, whichever of
/// the finish and cancel paths gets there first.
pub(crate) struct CompletionGuard {
    slot: Mutex<Option<TransitionCompletion>>,
}

impl CompletionGuard {
    pub(crate) fn new(completion: TransitionCompletion) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Some(completion)),
        })
    }

    /// Invoke the completion if it has not fired yet.
    pub(crate) fn fire(&self, success: bool) {
        let completion = self.slot.lock().take();
        if let Some(completion) = completion {
            completion(success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_completion_guard_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let guard = CompletionGuard::new(Box::new(move |success| {
            assert!(success);
            c.fetch_add(1, Ordering::SeqCst);
        }));

        guard.fire(true);
        guard.fire(false);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
