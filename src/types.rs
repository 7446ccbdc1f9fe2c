//! Core value types for the viewport: cameras, insets, and status.

use crate::states::ViewportState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Edge insets in screen points.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Per-edge sum, used to merge safe-area insets into configured padding.
    pub fn adding(self, other: EdgeInsets) -> EdgeInsets {
        EdgeInsets {
            top: self.top + other.top,
            left: self.left + other.left,
            bottom: self.bottom + other.bottom,
            right: self.right + other.right,
        }
    }
}

impl std::ops::Add for EdgeInsets {
    type Output = EdgeInsets;

    fn add(self, other: EdgeInsets) -> EdgeInsets {
        self.adding(other)
    }
}

/// A point in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenCoordinate {
    pub x: f64,
    pub y: f64,
}

impl ScreenCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A possibly-partial camera configuration.
///
/// Every field is independently optional; an unset field means "leave
/// whatever is currently displayed alone." Equality is structural on the
/// set fields.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub center: Option<Coordinate>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub pitch: Option<f64>,
    pub padding: Option<EdgeInsets>,
}

impl Camera {
    /// A camera with every field unset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Merge rule: every field present in `patch` replaces the
    /// corresponding field of `self`; absent fields fall through.
    pub fn override_with(&self, patch: &Camera) -> Camera {
        Camera {
            center: patch.center.or(self.center),
            zoom: patch.zoom.or(self.zoom),
            bearing: patch.bearing.or(self.bearing),
            pitch: patch.pitch.or(self.pitch),
            padding: patch.padding.or(self.padding),
        }
    }

    /// Add `insets` on top of this camera's padding (unset padding counts
    /// as zero).
    pub fn merge_padding(&self, insets: EdgeInsets) -> Camera {
        let mut merged = self.clone();
        merged.padding = Some(self.padding.unwrap_or_default().adding(insets));
        merged
    }

    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.center.is_none()
            && self.zoom.is_none()
            && self.bearing.is_none()
            && self.pitch.is_none()
            && self.padding.is_none()
    }
}

/// One sample from the continuous location source.
#[derive(Clone, Debug, PartialEq)]
pub struct PuckSample {
    pub coordinate: Coordinate,
    /// Device heading in degrees, if the platform reports one.
    pub heading: Option<f64>,
    /// Course over ground in degrees, if moving.
    pub course: Option<f64>,
}

impl PuckSample {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            heading: None,
            course: None,
        }
    }
}

/// What the viewport is currently doing.
///
/// Exactly one status holds at a time. States are compared by identity:
/// two statuses are equal when they hold the same state objects, not
/// structurally-equal ones.
#[derive(Clone)]
pub enum ViewportStatus {
    /// No state is driving the camera.
    Idle,
    /// `state` is continuously driving the camera.
    Active(Arc<dyn ViewportState>),
    /// A transition toward `to` is in flight. `from` is absent when the
    /// transition started from idle.
    Transitioning {
        from: Option<Arc<dyn ViewportState>>,
        to: Arc<dyn ViewportState>,
    },
}

impl ViewportStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewportStatus::Idle)
    }

    /// The state currently driving (or about to drive) the camera.
    pub fn state(&self) -> Option<&Arc<dyn ViewportState>> {
        match self {
            ViewportStatus::Idle => None,
            ViewportStatus::Active(state) => Some(state),
            ViewportStatus::Transitioning { to, .. } => Some(to),
        }
    }
}

fn same_state(a: &Arc<dyn ViewportState>, b: &Arc<dyn ViewportState>) -> bool {
    Arc::ptr_eq(a, b)
}

impl PartialEq for ViewportStatus {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ViewportStatus::Idle, ViewportStatus::Idle) => true,
            (ViewportStatus::Active(a), ViewportStatus::Active(b)) => same_state(a, b),
            (
                ViewportStatus::Transitioning { from: fa, to: ta },
                ViewportStatus::Transitioning { from: fb, to: tb },
            ) => {
                let from_eq = match (fa, fb) {
                    (None, None) => true,
                    (Some(a), Some(b)) => same_state(a, b),
                    _ => false,
                };
                from_eq && same_state(ta, tb)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ViewportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportStatus::Idle => write!(f, "Idle"),
            ViewportStatus::Active(state) => {
                write!(f, "Active({:p})", Arc::as_ptr(state))
            }
            ViewportStatus::Transitioning { from, to } => {
                match from {
                    Some(from) => write!(f, "Transitioning({:p} -> ", Arc::as_ptr(from))?,
                    None => write!(f, "Transitioning(_ -> ")?,
                }
                write!(f, "{:p})", Arc::as_ptr(to))
            }
        }
    }
}

/// Why the status changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportStatusChangeReason {
    /// A direct `idle()` or `transition_to()` call.
    Requested,
    /// A transition ended without reaching its target.
    Interrupted,
    /// A transition reached its target.
    CompletedSuccessfully,
}

/// One status change, as delivered to status observers.
#[derive(Clone, Debug)]
pub struct ViewportStatusChange {
    pub from: ViewportStatus,
    pub to: ViewportStatus,
    pub reason: ViewportStatusChangeReason,
}
