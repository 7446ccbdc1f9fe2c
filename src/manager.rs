//! The viewport state machine tying states and transitions together.

use crate::error::Result;
use crate::interfaces::{CameraAnimator, CameraFitCalculator, CameraSink};
use crate::observable::{AnyCancelable, Signal, Subject};
use crate::states::{
    ConstantViewportState, FollowPuckViewportState, FollowPuckViewportStateOptions,
    OverviewViewportState, OverviewViewportStateOptions, ViewportState,
};
use crate::transitions::{
    DefaultViewportTransition, DefaultViewportTransitionOptions, EaseToViewportTransition,
    EaseToViewportTransitionOptions, FlyToViewportTransition, FlyToViewportTransitionOptions,
    ImmediateViewportTransition, TransitionCompletion, ViewportTransition,
};
use crate::types::{
    Camera, EdgeInsets, PuckSample, ViewportStatus, ViewportStatusChange,
    ViewportStatusChangeReason,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The collaborator handles the viewport core runs against.
#[derive(Clone)]
pub struct ViewportContext {
    /// The externally-owned displayed camera.
    pub camera: Arc<dyn CameraSink>,
    /// The external per-frame animation facility.
    pub animator: Arc<dyn CameraAnimator>,
    /// The external "camera that frames these coordinates" primitive.
    pub fit_calculator: Arc<dyn CameraFitCalculator>,
    /// Continuous location/heading/course samples.
    pub puck: Signal<PuckSample>,
    /// Safe-area insets; expected to replay its latest value to new
    /// subscribers.
    pub safe_area: Signal<EdgeInsets>,
}

/// Manager configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportManagerOptions {
    /// Options for the transition used when `transition_to` is given
    /// none.
    pub default_transition: DefaultViewportTransitionOptions,
}

/// Sequences viewport states and transitions and reports status changes.
///
/// Exactly one status holds at a time. All work (cancellation, camera
/// handoff, observer notification) happens synchronously on the calling
/// thread; there is never a window with two transitions driving the
/// camera.
pub struct ViewportManager {
    context: ViewportContext,
    shared: Arc<ManagerShared>,
    default_transition: Mutex<Arc<dyn ViewportTransition>>,
}

struct ManagerShared {
    inner: Mutex<ManagerInner>,
    status_changes: Subject<ViewportStatusChange>,
}

struct ManagerInner {
    status: ViewportStatus,
    /// Handle for the in-flight transition, if any.
    transition: Option<AnyCancelable>,
    /// Pending-request token. Each `idle`/`transition_to` bumps it; a
    /// transition completion whose token no longer matches has been
    /// superseded and must leave the status alone.
    token: u64,
}

impl ManagerShared {
    /// Swap the status and notify observers, synchronously, in
    /// registration order. Setting the current status again is a no-op.
    fn set_status(&self, status: ViewportStatus, reason: ViewportStatusChangeReason) {
        let change = {
            let mut inner = self.inner.lock();
            if inner.status == status {
                return;
            }
            let from = std::mem::replace(&mut inner.status, status.clone());
            ViewportStatusChange {
                from,
                to: status,
                reason,
            }
        };
        tracing::debug!(
            from = ?change.from,
            to = ?change.to,
            reason = ?change.reason,
            "viewport status changed"
        );
        self.status_changes.send(&change);
    }
}

impl ViewportManager {
    pub fn new(context: ViewportContext) -> Self {
        // The built-in defaults are known-good; only caller-supplied
        // options go through validation.
        let default_transition: Arc<dyn ViewportTransition> =
            Arc::new(DefaultViewportTransition::new(
                context.camera.clone(),
                context.animator.clone(),
                DefaultViewportTransitionOptions::default(),
            ));
        Self {
            context,
            shared: Arc::new(ManagerShared {
                inner: Mutex::new(ManagerInner {
                    status: ViewportStatus::Idle,
                    transition: None,
                    token: 0,
                }),
                status_changes: Subject::new(),
            }),
            default_transition: Mutex::new(default_transition),
        }
    }

    pub fn with_options(context: ViewportContext, options: ViewportManagerOptions) -> Result<Self> {
        options.default_transition.validate()?;
        let manager = Self::new(context);
        *manager.default_transition.lock() = Arc::new(DefaultViewportTransition::new(
            manager.context.camera.clone(),
            manager.context.animator.clone(),
            options.default_transition,
        ));
        Ok(manager)
    }

    /// The current status.
    pub fn status(&self) -> ViewportStatus {
        self.shared.inner.lock().status.clone()
    }

    /// Register a status observer. Observers are notified in
    /// registration order, synchronously at the point the status changes.
    pub fn add_status_observer(
        &self,
        mut handler: impl FnMut(&ViewportStatusChange) + Send + 'static,
    ) -> AnyCancelable {
        self.shared.status_changes.observe(move |change| {
            handler(change);
            true
        })
    }

    /// Replace the transition used when `transition_to` is given none.
    pub fn set_default_transition(&self, transition: Arc<dyn ViewportTransition>) {
        *self.default_transition.lock() = transition;
    }

    /// Stop driving the camera: cancels any in-flight transition (its
    /// completion fires `false`) and releases the active state.
    /// Idempotent from idle.
    pub fn idle(&self) {
        tracing::debug!("viewport idle requested");
        let (in_flight, previous_status) = {
            let mut inner = self.shared.inner.lock();
            inner.token += 1;
            (inner.transition.take(), inner.status.clone())
        };
        if let Some(handle) = in_flight {
            handle.cancel();
        }
        if let ViewportStatus::Active(state) = &previous_status {
            state.stop_updating_camera();
        }
        self.shared
            .set_status(ViewportStatus::Idle, ViewportStatusChangeReason::Requested);
    }

    /// Run `transition` toward `to` and make `to` active when it
    /// completes.
    ///
    /// Any in-flight transition is cancelled first, synchronously: its
    /// completion fires `false` before the new transition begins. If the
    /// new transition is itself superseded later, its completion leaves
    /// the status alone; the newer request owns it.
    pub fn transition_to(
        &self,
        to: Arc<dyn ViewportState>,
        transition: Option<Arc<dyn ViewportTransition>>,
        completion: Option<TransitionCompletion>,
    ) {
        let strategy = transition.unwrap_or_else(|| self.default_transition.lock().clone());

        // Claim the pending-request token and detach the previous
        // transition before cancelling it, so its completion sees itself
        // superseded.
        let (superseded, previous_status, token) = {
            let mut inner = self.shared.inner.lock();
            inner.token += 1;
            (inner.transition.take(), inner.status.clone(), inner.token)
        };
        if let Some(handle) = superseded {
            handle.cancel();
        }

        let from = match &previous_status {
            ViewportStatus::Idle => None,
            ViewportStatus::Active(state) => {
                state.stop_updating_camera();
                Some(state.clone())
            }
            ViewportStatus::Transitioning {
                to: previous_target,
                ..
            } => Some(previous_target.clone()),
        };

        self.shared.set_status(
            ViewportStatus::Transitioning {
                from: from.clone(),
                to: to.clone(),
            },
            ViewportStatusChangeReason::Requested,
        );

        let shared = self.shared.clone();
        let target = to.clone();
        let finished = Arc::new(AtomicBool::new(false));
        let finished_flag = finished.clone();
        let wrapped: TransitionCompletion = Box::new(move |success| {
            finished_flag.store(true, Ordering::SeqCst);
            let (owns_status, spent_handle) = {
                let mut inner = shared.inner.lock();
                if inner.token == token {
                    (true, inner.transition.take())
                } else {
                    (false, None)
                }
            };
            if owns_status {
                // Tear the finished run down so its subscriptions stop;
                // the camera now belongs to the state (or to nobody).
                if let Some(handle) = spent_handle {
                    handle.cancel();
                }
                if success {
                    target.start_updating_camera();
                    shared.set_status(
                        ViewportStatus::Active(target.clone()),
                        ViewportStatusChangeReason::CompletedSuccessfully,
                    );
                } else {
                    shared.set_status(
                        ViewportStatus::Idle,
                        ViewportStatusChangeReason::Interrupted,
                    );
                }
            }
            if let Some(complete) = completion {
                complete(success);
            }
        });

        let handle = strategy.run(from.as_ref(), &to, wrapped);

        // Only remember the handle if this request is still current and
        // the strategy did not already complete synchronously; otherwise
        // tear it down now (completion has already fired, so this only
        // releases whatever the run left subscribed).
        let store = {
            let mut inner = self.shared.inner.lock();
            let current = inner.token == token && !finished.load(Ordering::SeqCst);
            if current {
                inner.transition = Some(handle.clone());
            }
            current
        };
        if !store {
            handle.cancel();
        }
    }

    // --- State factories ---

    pub fn make_constant_state(&self, camera: Camera) -> Arc<ConstantViewportState> {
        Arc::new(ConstantViewportState::new(
            camera,
            self.context.camera.clone(),
            self.context.safe_area.clone(),
        ))
    }

    /// A constant state showing the camera a style document declares as
    /// its default.
    pub fn make_state_from_style_default(
        &self,
        style_json: &str,
    ) -> Result<Arc<ConstantViewportState>> {
        Ok(Arc::new(ConstantViewportState::from_style_default(
            style_json,
            self.context.camera.clone(),
            self.context.safe_area.clone(),
        )?))
    }

    pub fn make_follow_puck_state(
        &self,
        options: FollowPuckViewportStateOptions,
    ) -> Result<Arc<FollowPuckViewportState>> {
        Ok(Arc::new(FollowPuckViewportState::new(
            options,
            self.context.puck.clone(),
            self.context.safe_area.clone(),
            self.context.camera.clone(),
        )?))
    }

    pub fn make_overview_state(
        &self,
        options: OverviewViewportStateOptions,
    ) -> Result<Arc<OverviewViewportState>> {
        Ok(Arc::new(OverviewViewportState::new(
            options,
            self.context.fit_calculator.clone(),
            self.context.safe_area.clone(),
            self.context.camera.clone(),
        )?))
    }

    // --- Transition factories ---

    pub fn make_immediate_transition(&self) -> Arc<ImmediateViewportTransition> {
        Arc::new(ImmediateViewportTransition::new(self.context.camera.clone()))
    }

    pub fn make_ease_transition(
        &self,
        options: EaseToViewportTransitionOptions,
    ) -> Arc<EaseToViewportTransition> {
        Arc::new(EaseToViewportTransition::new(
            self.context.animator.clone(),
            options,
        ))
    }

    pub fn make_fly_transition(
        &self,
        options: FlyToViewportTransitionOptions,
    ) -> Arc<FlyToViewportTransition> {
        Arc::new(FlyToViewportTransition::new(
            self.context.animator.clone(),
            options,
        ))
    }

    pub fn make_default_transition(
        &self,
        options: DefaultViewportTransitionOptions,
    ) -> Result<Arc<DefaultViewportTransition>> {
        options.validate()?;
        Ok(Arc::new(DefaultViewportTransition::new(
            self.context.camera.clone(),
            self.context.animator.clone(),
            options,
        )))
    }
}
