//! Shared collaborator doubles for the integration suites.
#![allow(dead_code)] // each suite uses its own subset

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use viewport::{
    AnimationCompletion, AnyCancelable, Camera, CameraAnimation, CameraAnimator,
    CameraFitCalculator, CameraSink, Coordinate, CurrentValueSubject, EdgeInsets, PuckSample,
    Subject, ViewportContext,
};

/// A camera sink that resolves partial writes onto the displayed camera
/// and keeps a write log.
pub struct RecordingSink {
    camera: Mutex<Camera>,
    pub writes: Mutex<Vec<Camera>>,
}

impl RecordingSink {
    pub fn new(initial: Camera) -> Arc<Self> {
        Arc::new(Self {
            camera: Mutex::new(initial),
            writes: Mutex::new(Vec::new()),
        })
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl CameraSink for RecordingSink {
    fn set_camera(&self, camera: &Camera) {
        let mut displayed = self.camera.lock();
        *displayed = displayed.override_with(camera);
        self.writes.lock().push(camera.clone());
    }

    fn current_camera(&self) -> Camera {
        self.camera.lock().clone()
    }
}

struct PendingAnimation {
    animation: CameraAnimation,
    completion: Arc<Mutex<Option<AnimationCompletion>>>,
}

/// An animator that parks every request until the test drives it.
///
/// Completing an animation with `true` lands its target on the sink, the
/// way a real animator's final frame would. Cancelling an in-flight
/// animation fires its completion with `false` synchronously.
pub struct ScriptedAnimator {
    sink: Arc<RecordingSink>,
    pending: Mutex<Vec<PendingAnimation>>,
}

impl ScriptedAnimator {
    pub fn new(sink: Arc<RecordingSink>) -> Arc<Self> {
        Arc::new(Self {
            sink,
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn pending_targets(&self) -> Vec<Camera> {
        self.pending
            .lock()
            .iter()
            .map(|p| p.animation.target.clone())
            .collect()
    }

    pub fn pending_animations(&self) -> Vec<CameraAnimation> {
        self.pending.lock().iter().map(|p| p.animation.clone()).collect()
    }

    /// Drive the oldest in-flight animation to its end (or abort it).
    pub fn finish_next(&self, reached_end: bool) {
        let pending = self.pending.lock().remove(0);
        if reached_end {
            self.sink.set_camera(&pending.animation.target);
        }
        let completion = pending.completion.lock().take();
        if let Some(completion) = completion {
            completion(reached_end);
        }
    }

    /// Drive every in-flight animation to its end, oldest first.
    pub fn finish_all(&self, reached_end: bool) {
        while self.pending_count() > 0 {
            self.finish_next(reached_end);
        }
    }

    fn park(&self, animation: CameraAnimation, completion: AnimationCompletion) -> AnyCancelable {
        let completion = Arc::new(Mutex::new(Some(completion)));
        let parked = completion.clone();
        self.pending.lock().push(PendingAnimation {
            animation,
            completion,
        });
        AnyCancelable::new(move || {
            let completion = parked.lock().take();
            if let Some(completion) = completion {
                completion(false);
            }
        })
    }
}

impl CameraAnimator for ScriptedAnimator {
    fn ease(&self, animation: CameraAnimation, completion: AnimationCompletion) -> AnyCancelable {
        self.park(animation, completion)
    }

    fn fly(
        &self,
        target: &Camera,
        duration: Option<Duration>,
        completion: AnimationCompletion,
    ) -> AnyCancelable {
        let animation = CameraAnimation::new(
            target.clone(),
            duration.unwrap_or(Duration::ZERO),
            viewport::EasingCurve::Linear,
        );
        self.park(animation, completion)
    }
}

/// Frames geometries at their bounding-box center; zoom shrinks with the
/// spread, mimicking a fit computation without projection math.
pub struct BoundsFitCalculator;

impl CameraFitCalculator for BoundsFitCalculator {
    fn camera_for_coordinates(
        &self,
        coordinates: &[Coordinate],
        padding: EdgeInsets,
        bearing: Option<f64>,
        pitch: Option<f64>,
    ) -> Option<Camera> {
        let first = coordinates.first()?;
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
        for c in coordinates {
            min_lat = min_lat.min(c.latitude);
            max_lat = max_lat.max(c.latitude);
            min_lon = min_lon.min(c.longitude);
            max_lon = max_lon.max(c.longitude);
        }
        let spread = (max_lat - min_lat).max(max_lon - min_lon);
        Some(Camera {
            center: Some(Coordinate::new(
                (min_lat + max_lat) / 2.0,
                (min_lon + max_lon) / 2.0,
            )),
            zoom: Some(if spread > 0.0 { 16.0 - spread } else { 16.0 }),
            bearing,
            pitch,
            padding: Some(padding),
        })
    }
}

/// Everything an integration test needs: the context plus handles to the
/// doubles behind it.
pub struct World {
    pub sink: Arc<RecordingSink>,
    pub animator: Arc<ScriptedAnimator>,
    pub puck: Subject<PuckSample>,
    pub safe_area: CurrentValueSubject<EdgeInsets>,
    pub context: ViewportContext,
}

impl World {
    pub fn new() -> Self {
        Self::with_camera(
            Camera::empty()
                .with_center(Coordinate::new(0.0, 0.0))
                .with_zoom(10.0)
                .with_bearing(0.0)
                .with_pitch(0.0)
                .with_padding(EdgeInsets::default()),
        )
    }

    pub fn with_camera(displayed: Camera) -> Self {
        let sink = RecordingSink::new(displayed);
        let animator = ScriptedAnimator::new(sink.clone());
        let puck = Subject::new();
        let safe_area = CurrentValueSubject::with_initial(EdgeInsets::default());
        let context = ViewportContext {
            camera: sink.clone(),
            animator: animator.clone(),
            fit_calculator: Arc::new(BoundsFitCalculator),
            puck: puck.signal(),
            safe_area: safe_area.signal(),
        };
        Self {
            sink,
            animator,
            puck,
            safe_area,
            context,
        }
    }
}
