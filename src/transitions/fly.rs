//! Fixed-target fly-to transition.

use super::{CompletionGuard, TransitionCompletion, ViewportTransition};
use crate::interfaces::CameraAnimator;
use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Options for [`FlyToViewportTransition`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FlyToViewportTransitionOptions {
    /// `None` lets the animator derive the duration from the distance
    /// covered.
    pub duration: Option<Duration>,
}

/// Takes the first camera the target state emits and flies toward it
/// along the animator's zoom-out/traverse/zoom-in arc.
pub struct FlyToViewportTransition {
    animator: Arc<dyn CameraAnimator>,
    options: FlyToViewportTransitionOptions,
}

impl FlyToViewportTransition {
    pub fn new(animator: Arc<dyn CameraAnimator>, options: FlyToViewportTransitionOptions) -> Self {
        Self { animator, options }
    }
}

impl ViewportTransition for FlyToViewportTransition {
    fn run(
        &self,
        _from: Option<&Arc<dyn ViewportState>>,
        to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable {
        let guard = CompletionGuard::new(completion);
        let animation_handle: Arc<Mutex<Option<AnyCancelable>>> = Arc::new(Mutex::new(None));

        let animator = self.animator.clone();
        let duration = self.options.duration;
        let on_finish = guard.clone();
        let handle_slot = animation_handle.clone();
        let subscription = to.observe_camera(Box::new(move |camera| {
            let guard = on_finish.clone();
            let handle = animator.fly(
                camera,
                duration,
                Box::new(move |finished| guard.fire(finished)),
            );
            *handle_slot.lock() = Some(handle);
            false
        }));

        AnyCancelable::new(move || {
            subscription.cancel();
            let in_flight = animation_handle.lock().take();
            if let Some(handle) = in_flight {
                handle.cancel();
            }
            guard.fire(false);
        })
    }
}
