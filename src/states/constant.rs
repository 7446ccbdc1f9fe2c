//! A state that shows one fixed camera.

use super::{CameraWriter, ViewportState};
use crate::error::Result;
use crate::interfaces::CameraSink;
use crate::observable::{AnyCancelable, ObserverHandler, Signal};
use crate::style;
use crate::types::{Camera, EdgeInsets};
use std::sync::Arc;

/// Emits a single fixed camera, re-emitting whenever the external
/// safe-area padding changes. The safe-area insets are added on top of
/// the camera's own padding.
pub struct ConstantViewportState {
    camera: Camera,
    safe_area: Signal<EdgeInsets>,
    writer: CameraWriter,
}

impl ConstantViewportState {
    pub fn new(camera: Camera, sink: Arc<dyn CameraSink>, safe_area: Signal<EdgeInsets>) -> Self {
        Self {
            camera,
            writer: CameraWriter::new(sink),
            safe_area,
        }
    }

    /// A constant state showing the camera a style document declares as
    /// its default.
    pub fn from_style_default(
        style_json: &str,
        sink: Arc<dyn CameraSink>,
        safe_area: Signal<EdgeInsets>,
    ) -> Result<Self> {
        let camera = style::default_camera_from_style(style_json)?;
        Ok(Self::new(camera, sink, safe_area))
    }

    /// The fixed camera, without safe-area padding applied.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_signal(&self) -> Signal<Camera> {
        let base = self.camera.clone();
        self.safe_area
            .map(move |insets| base.merge_padding(*insets))
            .skip_repeats()
    }
}

impl ViewportState for ConstantViewportState {
    fn observe_camera(&self, handler: ObserverHandler<Camera>) -> AnyCancelable {
        self.camera_signal().observe_boxed(handler)
    }

    fn start_updating_camera(&self) {
        self.writer.start(&self.camera_signal());
    }

    fn stop_updating_camera(&self) {
        self.writer.stop();
    }
}
