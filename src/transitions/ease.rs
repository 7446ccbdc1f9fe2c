//! Fixed-target eased transition.

use super::{CompletionGuard, TransitionCompletion, ViewportTransition};
use crate::interfaces::{CameraAnimation, CameraAnimator, EasingCurve};
use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Options for [`EaseToViewportTransition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EaseToViewportTransitionOptions {
    pub duration: Duration,
    pub curve: EasingCurve,
}

impl Default for EaseToViewportTransitionOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            curve: EasingCurve::EaseOut,
        }
    }
}

/// Takes the FIRST camera the target state emits as a fixed target and
/// eases toward it over the configured duration. Later emissions from a
/// moving target are ignored for this run.
pub struct EaseToViewportTransition {
    animator: Arc<dyn CameraAnimator>,
    options: EaseToViewportTransitionOptions,
}

impl EaseToViewportTransition {
    pub fn new(animator: Arc<dyn CameraAnimator>, options: EaseToViewportTransitionOptions) -> Self {
        Self { animator, options }
    }
}

impl ViewportTransition for EaseToViewportTransition {
    fn run(
        &self,
        _from: Option<&Arc<dyn ViewportState>>,
        to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable {
        let guard = CompletionGuard::new(completion);
        let animation_handle: Arc<Mutex<Option<AnyCancelable>>> = Arc::new(Mutex::new(None));

        let animator = self.animator.clone();
        let options = self.options;
        let on_finish = guard.clone();
        let handle_slot = animation_handle.clone();
        let subscription = to.observe_camera(Box::new(move |camera| {
            let guard = on_finish.clone();
            let handle = animator.ease(
                CameraAnimation::new(camera.clone(), options.duration, options.curve),
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
