//! The default composite transition.
//!
//! Decomposes a camera change into up to three concurrently running phase
//! animations (zoom-out, pan, zoom-in) whose ordering depends on
//! whether the camera is zooming in or out. The phase durations and
//! delays here are a tuning policy pinned by the golden-value tests at
//! the bottom of this file.

use super::{CompletionGuard, TransitionCompletion, ViewportTransition};
use crate::error::{Result, ViewportError};
use crate::interfaces::{CameraAnimation, CameraAnimator, CameraSink, EasingCurve};
use crate::observable::AnyCancelable;
use crate::states::ViewportState;
use crate::types::Camera;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Options for [`DefaultViewportTransition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefaultViewportTransitionOptions {
    /// Cap on the total transition length. When the naive phase plan runs
    /// longer, every duration and delay is scaled down uniformly.
    pub max_duration: Duration,
}

impl Default for DefaultViewportTransitionOptions {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs_f64(3.5),
        }
    }
}

impl DefaultViewportTransitionOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_duration.is_zero() {
            return Err(ViewportError::InvalidOption {
                name: "max_duration",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

const SECONDS_PER_ZOOM_LEVEL: f64 = 0.3;
const MIN_ZOOM_PHASE: f64 = 0.2;
const MAX_ZOOM_PHASE: f64 = 1.6;
const SECONDS_PER_DEGREE: f64 = 0.1;
const MIN_PAN_PHASE: f64 = 0.3;
const MAX_PAN_PHASE: f64 = 1.2;
/// Pans longer than this (in degrees) get an intermediate zoom-out dip
/// so the traverse reads as motion rather than a teleport.
const LONG_PAN_DEGREES: f64 = 3.0;
const DIP_LEVELS_PER_DEGREE: f64 = 0.25;
const MAX_DIP_LEVELS: f64 = 3.0;

/// Animates toward the first camera the target state emits by running a
/// planned set of phase animations concurrently. Completes once every
/// phase has reported; success is the logical AND of the phase results.
pub struct DefaultViewportTransition {
    sink: Arc<dyn CameraSink>,
    animator: Arc<dyn CameraAnimator>,
    options: DefaultViewportTransitionOptions,
}

impl DefaultViewportTransition {
    pub fn new(
        sink: Arc<dyn CameraSink>,
        animator: Arc<dyn CameraAnimator>,
        options: DefaultViewportTransitionOptions,
    ) -> Self {
        Self {
            sink,
            animator,
            options,
        }
    }
}

impl ViewportTransition for DefaultViewportTransition {
    fn run(
        &self,
        _from: Option<&Arc<dyn ViewportState>>,
        to: &Arc<dyn ViewportState>,
        completion: TransitionCompletion,
    ) -> AnyCancelable {
        let guard = CompletionGuard::new(completion);
        let phase_handles: Arc<Mutex<Vec<AnyCancelable>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = self.sink.clone();
        let animator = self.animator.clone();
        let max_duration = self.options.max_duration;
        let on_finish = guard.clone();
        let handles = phase_handles.clone();
        let subscription = to.observe_camera(Box::new(move |target| {
            let current = sink.current_camera();
            let mut phases = plan_phases(&current, target);
            scale_to_fit(&mut phases, max_duration);
            tracing::debug!(phase_count = phases.len(), "running default transition");

            let join = Arc::new(Mutex::new(PhaseJoin {
                remaining: phases.len(),
                all_reached_end: true,
            }));
            let mut started = handles.lock();
            for phase in phases {
                let join = join.clone();
                let guard = on_finish.clone();
                let handle = animator.ease(
                    phase,
                    Box::new(move |reached_end| {
                        let finished = {
                            let mut join = join.lock();
                            join.remaining -= 1;
                            join.all_reached_end &= reached_end;
                            (join.remaining == 0).then_some(join.all_reached_end)
                        };
                        if let Some(all_reached_end) = finished {
                            guard.fire(all_reached_end);
                        }
                    }),
                );
                started.push(handle);
            }
            false
        }));

        AnyCancelable::new(move || {
            subscription.cancel();
            for handle in phase_handles.lock().drain(..) {
                handle.cancel();
            }
            guard.fire(false);
        })
    }
}

struct PhaseJoin {
    remaining: usize,
    all_reached_end: bool,
}

/// Plan the phase animations from `current` to `target`.
///
/// Zooming out: the zoom-out leads and the pan joins halfway through it.
/// Zooming in over a short pan: the pan leads and the zoom-in joins
/// halfway. Zooming in over a long pan: an intermediate zoom-out dip
/// runs first, the pan joins halfway through the dip, and the zoom-in
/// joins halfway through the pan.
fn plan_phases(current: &Camera, target: &Camera) -> Vec<CameraAnimation> {
    let distance = pan_distance(current, target);
    let pan = pan_phase(target, distance);

    let (Some(current_zoom), Some(target_zoom)) = (current.zoom, target.zoom) else {
        // Without both zooms there is no ordering to choose; pan, and
        // carry the target zoom along if one was asked for.
        let mut phases = vec![pan];
        if let Some(zoom) = target.zoom {
            phases.push(zoom_phase(zoom, MIN_ZOOM_PHASE, 0.0, EasingCurve::EaseInOut));
        }
        return phases;
    };

    if target_zoom < current_zoom {
        // Zooming out: lead with the zoom so the pan happens in context.
        let zoom_seconds = zoom_seconds(current_zoom - target_zoom);
        let pan = pan.with_delay(seconds(zoom_seconds * 0.5));
        vec![
            zoom_phase(target_zoom, zoom_seconds, 0.0, EasingCurve::EaseIn),
            pan,
        ]
    } else if target_zoom > current_zoom {
        let dip = (distance * DIP_LEVELS_PER_DEGREE).min(MAX_DIP_LEVELS);
        if distance > LONG_PAN_DEGREES && dip > f64::EPSILON && current_zoom > 0.0 {
            // Long pan: dip out, traverse, then zoom in to the target.
            let mid_zoom = (current_zoom - dip).max(0.0);
            let out_seconds = zoom_seconds(current_zoom - mid_zoom);
            let pan_seconds = pan.duration.as_secs_f64();
            let pan = pan.with_delay(seconds(out_seconds * 0.5));
            let in_delay = out_seconds * 0.5 + pan_seconds * 0.5;
            vec![
                zoom_phase(mid_zoom, out_seconds, 0.0, EasingCurve::EaseIn),
                pan,
                zoom_phase(
                    target_zoom,
                    zoom_seconds(target_zoom - mid_zoom),
                    in_delay,
                    EasingCurve::EaseOut,
                ),
            ]
        } else {
            // Zooming in nearby: lead with the pan.
            let pan_seconds = pan.duration.as_secs_f64();
            vec![
                pan,
                zoom_phase(
                    target_zoom,
                    zoom_seconds(target_zoom - current_zoom),
                    pan_seconds * 0.5,
                    EasingCurve::EaseOut,
                ),
            ]
        }
    } else {
        vec![pan]
    }
}

/// Uniformly scale durations and delays so the plan fits `max_duration`,
/// preserving relative timing. Plans already within the cap are left
/// untouched.
fn scale_to_fit(phases: &mut [CameraAnimation], max_duration: Duration) {
    let naive_total = phases
        .iter()
        .map(|phase| phase.delay.as_secs_f64() + phase.duration.as_secs_f64())
        .fold(0.0f64, f64::max);
    let max = max_duration.as_secs_f64();
    if naive_total <= max {
        return;
    }
    let factor = max / naive_total;
    for phase in phases {
        phase.duration = seconds(phase.duration.as_secs_f64() * factor);
        phase.delay = seconds(phase.delay.as_secs_f64() * factor);
    }
}

/// Everything but zoom travels in the pan phase.
fn pan_phase(target: &Camera, distance: f64) -> CameraAnimation {
    let pan_target = Camera {
        center: target.center,
        bearing: target.bearing,
        pitch: target.pitch,
        padding: target.padding,
        zoom: None,
    };
    let duration = if distance > 0.0 {
        (distance * SECONDS_PER_DEGREE).clamp(MIN_PAN_PHASE, MAX_PAN_PHASE)
    } else {
        MIN_PAN_PHASE
    };
    CameraAnimation::new(pan_target, seconds(duration), EasingCurve::EaseInOut)
}

fn zoom_phase(zoom: f64, duration_seconds: f64, delay_seconds: f64, curve: EasingCurve) -> CameraAnimation {
    CameraAnimation::new(Camera::empty().with_zoom(zoom), seconds(duration_seconds), curve)
        .with_delay(seconds(delay_seconds))
}

fn zoom_seconds(levels: f64) -> f64 {
    (levels.abs() * SECONDS_PER_ZOOM_LEVEL).clamp(MIN_ZOOM_PHASE, MAX_ZOOM_PHASE)
}

fn pan_distance(current: &Camera, target: &Camera) -> f64 {
    match (current.center, target.center) {
        (Some(a), Some(b)) => {
            let dlat = a.latitude - b.latitude;
            let dlon = a.longitude - b.longitude;
            (dlat * dlat + dlon * dlon).sqrt()
        }
        _ => 0.0,
    }
}

fn seconds(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.0))
}
