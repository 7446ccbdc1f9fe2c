//! A state that frames a geometry in full.

use super::{require_finite, require_in_range, CameraWriter, ViewportState};
use crate::error::{Result, ViewportError};
use crate::interfaces::{CameraFitCalculator, CameraSink};
use crate::observable::{AnyCancelable, CurrentValueSubject, ObserverHandler, Signal};
use crate::types::{Camera, Coordinate, EdgeInsets, ScreenCoordinate};
use std::sync::Arc;

/// Configuration for [`OverviewViewportState`].
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewViewportStateOptions {
    /// Coordinates the camera must keep in frame. Must not be empty.
    pub geometry: Vec<Coordinate>,
    /// Padding between the geometry and the viewport edges, on top of the
    /// external safe-area insets.
    pub padding: EdgeInsets,
    pub bearing: Option<f64>,
    pub pitch: Option<f64>,
    /// Upper bound on the computed zoom.
    pub max_zoom: Option<f64>,
    /// Screen offset of the framed geometry's center from the padded
    /// viewport center.
    pub offset: ScreenCoordinate,
}

impl Default for OverviewViewportStateOptions {
    fn default() -> Self {
        Self {
            geometry: Vec::new(),
            padding: EdgeInsets::default(),
            bearing: Some(0.0),
            pitch: Some(0.0),
            max_zoom: None,
            offset: ScreenCoordinate::default(),
        }
    }
}

impl OverviewViewportStateOptions {
    pub fn for_geometry(geometry: Vec<Coordinate>) -> Self {
        Self {
            geometry,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.geometry.is_empty() {
            return Err(ViewportError::EmptyGeometry);
        }
        if let Some(bearing) = self.bearing {
            require_finite("bearing", bearing)?;
        }
        if let Some(pitch) = self.pitch {
            require_in_range("pitch", pitch, 0.0, 85.0)?;
        }
        if let Some(max_zoom) = self.max_zoom {
            require_in_range("max_zoom", max_zoom, 0.0, 25.5)?;
        }
        Ok(())
    }
}

/// Recomputes a framing camera whenever the geometry, the fit parameters,
/// or the safe-area padding changes. The frame computation itself is
/// delegated to the external [`CameraFitCalculator`]; while it cannot
/// produce a camera, nothing is emitted.
pub struct OverviewViewportState {
    options: CurrentValueSubject<OverviewViewportStateOptions>,
    calculator: Arc<dyn CameraFitCalculator>,
    safe_area: Signal<EdgeInsets>,
    writer: CameraWriter,
}

impl OverviewViewportState {
    pub fn new(
        options: OverviewViewportStateOptions,
        calculator: Arc<dyn CameraFitCalculator>,
        safe_area: Signal<EdgeInsets>,
        sink: Arc<dyn CameraSink>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options: CurrentValueSubject::with_initial(options),
            calculator,
            safe_area,
            writer: CameraWriter::new(sink),
        })
    }

    pub fn options(&self) -> OverviewViewportStateOptions {
        self.options.value().unwrap_or_default()
    }

    /// Replace the configuration and recompute the frame.
    pub fn set_options(&self, options: OverviewViewportStateOptions) -> Result<()> {
        options.validate()?;
        self.options.send(&options);
        Ok(())
    }

    fn camera_signal(&self) -> Signal<Camera> {
        let calculator = self.calculator.clone();
        self.options
            .signal()
            .combine_latest(&self.safe_area)
            .filter_map(move |(options, insets)| frame(&*calculator, options, *insets))
            .skip_repeats()
    }
}

fn frame(
    calculator: &dyn CameraFitCalculator,
    options: &OverviewViewportStateOptions,
    insets: EdgeInsets,
) -> Option<Camera> {
    let mut camera = calculator.camera_for_coordinates(
        &options.geometry,
        offset_padding(options.padding.adding(insets), options.offset),
        options.bearing,
        options.pitch,
    )?;
    if let (Some(zoom), Some(max_zoom)) = (camera.zoom, options.max_zoom) {
        camera.zoom = Some(zoom.min(max_zoom));
    }
    Some(camera)
}

/// Express a screen offset of the frame center as an asymmetric padding
/// adjustment: shifting right/down grows the leading edges and shrinks
/// the trailing ones by the same amount.
fn offset_padding(padding: EdgeInsets, offset: ScreenCoordinate) -> EdgeInsets {
    EdgeInsets {
        top: padding.top + offset.y,
        left: padding.left + offset.x,
        bottom: padding.bottom - offset.y,
        right: padding.right - offset.x,
    }
}

impl ViewportState for OverviewViewportState {
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
