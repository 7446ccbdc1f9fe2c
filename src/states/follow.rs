//! A state that keeps the camera on the location puck.

use super::{require_finite, require_in_range, CameraWriter, ViewportState};
use crate::error::Result;
use crate::interfaces::CameraSink;
use crate::observable::{AnyCancelable, CurrentValueSubject, ObserverHandler, Signal};
use crate::types::{Camera, EdgeInsets, PuckSample};
use std::sync::Arc;

/// How the follow state derives the camera bearing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowPuckBearing {
    /// A fixed bearing in degrees.
    Constant(f64),
    /// The device heading reported by the platform.
    Heading,
    /// The course over ground.
    Course,
}

/// Configuration for [`FollowPuckViewportState`]. Mutable at any time via
/// [`FollowPuckViewportState::set_options`].
#[derive(Clone, Debug, PartialEq)]
pub struct FollowPuckViewportStateOptions {
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    /// `None` leaves the displayed bearing alone.
    pub bearing: Option<FollowPuckBearing>,
    pub padding: Option<EdgeInsets>,
}

impl Default for FollowPuckViewportStateOptions {
    fn default() -> Self {
        Self {
            zoom: Some(16.35),
            pitch: Some(45.0),
            bearing: Some(FollowPuckBearing::Heading),
            padding: None,
        }
    }
}

impl FollowPuckViewportStateOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(zoom) = self.zoom {
            require_in_range("zoom", zoom, 0.0, 25.5)?;
        }
        if let Some(pitch) = self.pitch {
            require_in_range("pitch", pitch, 0.0, 85.0)?;
        }
        if let Some(FollowPuckBearing::Constant(bearing)) = self.bearing {
            require_finite("bearing", bearing)?;
        }
        Ok(())
    }
}

/// Tracks the continuous puck sample stream: each sample becomes a camera
/// centered on the puck with the configured zoom, pitch, and bearing mode.
///
/// Until the first sample arrives nothing is emitted; a configuration
/// change re-emits immediately for subscribers that have already seen a
/// sample, and otherwise waits for the next one.
pub struct FollowPuckViewportState {
    options: CurrentValueSubject<FollowPuckViewportStateOptions>,
    puck: Signal<PuckSample>,
    safe_area: Signal<EdgeInsets>,
    writer: CameraWriter,
}

impl FollowPuckViewportState {
    pub fn new(
        options: FollowPuckViewportStateOptions,
        puck: Signal<PuckSample>,
        safe_area: Signal<EdgeInsets>,
        sink: Arc<dyn CameraSink>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options: CurrentValueSubject::with_initial(options),
            puck,
            safe_area,
            writer: CameraWriter::new(sink),
        })
    }

    pub fn options(&self) -> FollowPuckViewportStateOptions {
        self.options.value().unwrap_or_default()
    }

    /// Replace the configuration. Re-emits with the most recent sample if
    /// one has been seen.
    pub fn set_options(&self, options: FollowPuckViewportStateOptions) -> Result<()> {
        options.validate()?;
        self.options.send(&options);
        Ok(())
    }

    fn camera_signal(&self) -> Signal<Camera> {
        self.puck
            .combine_latest(&self.options.signal())
            .combine_latest(&self.safe_area)
            .map(|((sample, options), insets)| camera_for(sample, options, *insets))
            .skip_repeats()
    }
}

fn camera_for(
    sample: &PuckSample,
    options: &FollowPuckViewportStateOptions,
    insets: EdgeInsets,
) -> Camera {
    let bearing = match options.bearing {
        None => None,
        Some(FollowPuckBearing::Constant(bearing)) => Some(bearing),
        Some(FollowPuckBearing::Heading) => sample.heading,
        Some(FollowPuckBearing::Course) => sample.course,
    };
    Camera {
        center: Some(sample.coordinate),
        zoom: options.zoom,
        bearing,
        pitch: options.pitch,
        padding: Some(options.padding.unwrap_or_default().adding(insets)),
    }
}

impl ViewportState for FollowPuckViewportState {
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
