//! Viewport states: continuous sources of [`Camera`] values.

use crate::error::{Result, ViewportError};
use crate::interfaces::CameraSink;
use crate::observable::{AnyCancelable, ObserverHandler, Signal};
use crate::types::Camera;
use parking_lot::Mutex;
use std::sync::Arc;

mod constant;
mod follow;
mod overview;

pub use constant::ConstantViewportState;
pub use follow::{FollowPuckBearing, FollowPuckViewportState, FollowPuckViewportStateOptions};
pub use overview::{OverviewViewportState, OverviewViewportStateOptions};

/// A continuous source of camera values the viewport can run.
///
/// Implementations outside this crate are expected; the built-in variants
/// are [`ConstantViewportState`], [`FollowPuckViewportState`], and
/// [`OverviewViewportState`].
pub trait ViewportState: Send + Sync {
    /// Subscribe to the camera stream this state produces. The handler
    /// returns `false` to unsubscribe. A state whose input has not yet
    /// produced a computable camera emits nothing.
    fn observe_camera(&self, handler: ObserverHandler<Camera>) -> AnyCancelable;

    /// Take ownership of writing the live camera. The manager calls this
    /// exactly once when the state becomes active; calling it again
    /// without an intervening stop is a caller error.
    fn start_updating_camera(&self);

    /// Release camera ownership.
    fn stop_updating_camera(&self);
}

/// Shared start/stop plumbing: while started, forwards every camera the
/// state emits into the sink.
pub(crate) struct CameraWriter {
    sink: Arc<dyn CameraSink>,
    subscription: Mutex<Option<AnyCancelable>>,
}

impl CameraWriter {
    pub(crate) fn new(sink: Arc<dyn CameraSink>) -> Self {
        Self {
            sink,
            subscription: Mutex::new(None),
        }
    }

    pub(crate) fn start(&self, cameras: &Signal<Camera>) {
        let mut slot = self.subscription.lock();
        debug_assert!(slot.is_none(), "start_updating_camera called twice");
        let sink = self.sink.clone();
        *slot = Some(cameras.observe(move |camera| {
            sink.set_camera(camera);
            true
        }));
    }

    pub(crate) fn stop(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ViewportError::InvalidOption {
            name,
            reason: format!("must be finite, got {value}"),
        })
    }
}

pub(crate) fn require_in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<()> {
    require_finite(name, value)?;
    if value < min || value > max {
        return Err(ViewportError::InvalidOption {
            name,
            reason: format!("must be in [{min}, {max}], got {value}"),
        });
    }
    Ok(())
}
