//! The no-op transition.

use super::{TransitionCompletion, ViewportTransition};
use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use std::sync::Arc;

/// Completes synchronously and successfully without touching the camera.
///
/// Useful when the target state should simply take over from wherever the
/// camera currently is.
#[derive(Default)]
pub struct EmptyViewportTransition;

impl ViewportTransition for EmptyViewportTransition {
    fn run(
        &self,
        _from: Option<&Arc<dyn ViewportState>>,
        _to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable {
        completion(true);
        AnyCancelable::empty()
    }
}
