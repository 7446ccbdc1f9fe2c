//! Narrow collaborator interfaces the core is written against.
//!
//! Implementations live outside this crate (in the rendering engine and
//! platform glue). The core only needs to read and write the displayed
//! camera, hand animation work to an external per-frame driver, and ask
//! for a camera that frames a set of coordinates.

use crate::observable::AnyCancelable;
use crate::types::{Camera, Coordinate, EdgeInsets};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Completion callback for animator work. Receives `true` when the
/// animation reached its end state, `false` when cancelled.
pub type AnimationCompletion = Box<dyn FnOnce(bool) + Send>;

/// The single externally-owned "currently displayed camera" resource.
///
/// `set_camera` applies a possibly-partial camera immediately: set fields
/// overwrite the displayed values, unset fields are left alone.
/// `current_camera` reads back the fully-resolved displayed camera.
pub trait CameraSink: Send + Sync {
    fn set_camera(&self, camera: &Camera);
    fn current_camera(&self) -> Camera;
}

/// Easing curve over the unit interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EasingCurve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic bezier with control points `(x1, y1)` and `(x2, y2)`,
    /// endpoints pinned at `(0, 0)` and `(1, 1)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl EasingCurve {
    /// Evaluate the curve at `t` in `[0, 1]`. Inputs outside the interval
    /// are clamped.
    pub fn value(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            EasingCurve::Linear => t,
            EasingCurve::EaseIn => t * t * t,
            EasingCurve::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            EasingCurve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            EasingCurve::CubicBezier { x1, y1, x2, y2 } => bezier_value(t, x1, y1, x2, y2),
        }
    }
}

/// Solve y for the bezier parameterized by x using Newton iteration.
fn bezier_value(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    fn axis(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }
    fn axis_derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    let mut t = x;
    for _ in 0..8 {
        let error = axis(t, x1, x2) - x;
        if error.abs() < 1e-7 {
            break;
        }
        let slope = axis_derivative(t, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        t -= error / slope;
        t = t.clamp(0.0, 1.0);
    }
    axis(t, y1, y2)
}

/// One unit of animator work: ease the set fields of `target` over
/// `duration`, starting after `delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraAnimation {
    pub target: Camera,
    pub duration: Duration,
    pub delay: Duration,
    pub curve: EasingCurve,
}

impl CameraAnimation {
    pub fn new(target: Camera, duration: Duration, curve: EasingCurve) -> Self {
        Self {
            target,
            duration,
            delay: Duration::ZERO,
            curve,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// External animation facility, ticked by the host's display refresh
/// callback. Both operations are cancellable; cancelling fires the
/// completion with `false` synchronously.
pub trait CameraAnimator: Send + Sync {
    /// Interpolate the displayed camera toward `animation.target`.
    fn ease(&self, animation: CameraAnimation, completion: AnimationCompletion) -> AnyCancelable;

    /// Animate along a zoom-out/traverse/zoom-in arc. With `duration`
    /// absent the animator derives one from the distance covered.
    fn fly(
        &self,
        target: &Camera,
        duration: Option<Duration>,
        completion: AnimationCompletion,
    ) -> AnyCancelable;
}

/// External "camera that frames these coordinates" primitive.
///
/// Returns `None` when no framing camera is computable (for instance
/// before the map has a size); the caller treats that as "emit nothing."
pub trait CameraFitCalculator: Send + Sync {
    fn camera_for_coordinates(
        &self,
        coordinates: &[Coordinate],
        padding: EdgeInsets,
        bearing: Option<f64>,
        pitch: Option<f64>,
    ) -> Option<Camera>;
}
