//! Transition that writes the target's cameras straight to the sink.

use super::{CompletionGuard, TransitionCompletion, ViewportTransition};
use crate::interfaces::CameraSink;
use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use std::sync::Arc;

/// Applies every camera the target state emits directly, with no
/// interpolation, until cancelled.
///
/// Unlike the animated transitions, this one supports a continuously
/// moving target: the completion fires `true` on the first write, and the
/// subscription keeps running so later emissions keep landing.
pub struct ImmediateViewportTransition {
    sink: Arc<dyn CameraSink>,
}

impl ImmediateViewportTransition {
    pub fn new(sink: Arc<dyn CameraSink>) -> Self {
        Self { sink }
    }
}

impl ViewportTransition for ImmediateViewportTransition {
    fn run(
        &self,
        _from: Option<&Arc<dyn ViewportState>>,
        to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable {
        let guard = CompletionGuard::new(completion);

        let sink = self.sink.clone();
        let on_first = guard.clone();
        let subscription = to.observe_camera(Box::new(move |camera| {
            sink.set_camera(camera);
            on_first.fire(true);
            true
        }));

        AnyCancelable::new(move || {
            subscription.cancel();
            guard.fire(false);
        })
    }
}
