//! # Viewport
//!
//! The orchestration core that decides what camera the map is showing
//! and how it gets from camera A to camera B.
//!
//! ## Core Concepts
//!
//! - **Observable core**: push-based subjects and signals with explicit,
//!   idempotent cancellation
//! - **States**: continuous sources of camera values (constant,
//!   puck-following, geometry-fitting)
//! - **Transitions**: strategies that animate from the displayed camera
//!   to a state's stream
//! - **Manager**: the state machine that sequences states and
//!   transitions and reports status changes
//!
//! ## Example
//!
//! ```ignore
//! use viewport::{
//!     EaseToViewportTransitionOptions, OverviewViewportStateOptions, ViewportContext,
//!     ViewportManager,
//! };
//!
//! let manager = ViewportManager::new(ViewportContext {
//!     camera,
//!     animator,
//!     fit_calculator,
//!     puck,
//!     safe_area,
//! });
//!
//! let overview = manager.make_overview_state(OverviewViewportStateOptions::for_geometry(
//!     route_coordinates,
//! ))?;
//! let ease = manager.make_ease_transition(EaseToViewportTransitionOptions::default());
//!
//! manager.transition_to(overview, Some(ease), Some(Box::new(|reached| {
//!     if reached {
//!         // the overview state now owns the camera
//!     }
//! })));
//! ```

pub mod error;
pub mod interfaces;
pub mod manager;
pub mod observable;
pub mod states;
pub mod style;
pub mod transitions;
pub mod types;

// Re-exports
pub use error::{Result, ViewportError};
pub use interfaces::{
    AnimationCompletion, CameraAnimation, CameraAnimator, CameraFitCalculator, CameraSink,
    EasingCurve,
};
pub use manager::{ViewportContext, ViewportManager, ViewportManagerOptions};
pub use observable::{AnyCancelable, CurrentValueSubject, ObserverHandler, Signal, Subject};
pub use states::{
    ConstantViewportState, FollowPuckBearing, FollowPuckViewportState,
    FollowPuckViewportStateOptions, OverviewViewportState, OverviewViewportStateOptions,
    ViewportState,
};
pub use style::default_camera_from_style;
pub use transitions::{
    DefaultViewportTransition, DefaultViewportTransitionOptions, EaseToViewportTransition,
    EaseToViewportTransitionOptions, EmptyViewportTransition, FlyToViewportTransition,
    FlyToViewportTransitionOptions, ImmediateViewportTransition, TransitionCompletion,
    ViewportTransition,
};
pub use types::*;
