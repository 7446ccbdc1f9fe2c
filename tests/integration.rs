//! End-to-end flows through the manager, states, and transitions.

mod common;

use common::World;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use viewport::{
    Camera, CameraSink, Coordinate, EaseToViewportTransitionOptions, EdgeInsets, FollowPuckBearing,
    FollowPuckViewportStateOptions, OverviewViewportStateOptions, PuckSample, ViewportManager,
    ViewportState, ViewportStatus,
};

#[test]
fn test_overview_via_ease_reaches_target() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Idle -> ease toward an overview of [(0,0), (1,1)] -> Active.
    let world = World::new();
    let manager = ViewportManager::new(world.context.clone());

    let overview = manager
        .make_overview_state(OverviewViewportStateOptions::for_geometry(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
        ]))
        .unwrap();
    let ease = manager.make_ease_transition(EaseToViewportTransitionOptions {
        duration: Duration::from_secs(1),
        ..Default::default()
    });

    let completed = Arc::new(Mutex::new(None));
    let c = completed.clone();
    manager.transition_to(
        overview.clone(),
        Some(ease),
        Some(Box::new(move |reached| {
            *c.lock() = Some(reached);
        })),
    );

    // The fit calculator frames the geometry and the ease animator is
    // invoked with that camera as its fixed target.
    let to: Arc<dyn ViewportState> = overview.clone();
    assert_eq!(
        manager.status(),
        ViewportStatus::Transitioning {
            from: None,
            to: to.clone(),
        }
    );
    let targets = world.animator.pending_targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].center, Some(Coordinate::new(0.5, 0.5)));
    assert_eq!(targets[0].zoom, Some(15.0));
    assert_eq!(*completed.lock(), None);

    world.animator.finish_next(true);

    assert_eq!(*completed.lock(), Some(true));
    assert_eq!(manager.status(), ViewportStatus::Active(to));
    let displayed = world.sink.current_camera();
    assert_eq!(displayed.center, Some(Coordinate::new(0.5, 0.5)));
    assert_eq!(displayed.zoom, Some(15.0));
}

#[test]
fn test_follow_without_fix_idles_without_camera_write() {
    // Active(Follow) with no location yet -> idle(): nothing was ever
    // written and the status flips immediately.
    let world = World::new();
    let manager = ViewportManager::new(world.context.clone());

    let follow = manager
        .make_follow_puck_state(FollowPuckViewportStateOptions::default())
        .unwrap();
    manager.transition_to(
        follow.clone(),
        Some(Arc::new(viewport::EmptyViewportTransition)),
        None,
    );
    let active: Arc<dyn ViewportState> = follow.clone();
    assert_eq!(manager.status(), ViewportStatus::Active(active));
    assert_eq!(world.sink.write_count(), 0);

    manager.idle();
    assert_eq!(manager.status(), ViewportStatus::Idle);
    assert_eq!(world.sink.write_count(), 0);
}

#[test]
fn test_follow_tracks_through_immediate_transition() {
    let world = World::new();
    let manager = ViewportManager::new(world.context.clone());

    let follow = manager
        .make_follow_puck_state(FollowPuckViewportStateOptions {
            zoom: Some(15.0),
            pitch: None,
            bearing: Some(FollowPuckBearing::Course),
            padding: None,
        })
        .unwrap();
    manager.transition_to(
        follow.clone(),
        Some(manager.make_immediate_transition()),
        None,
    );

    // Nothing has arrived yet: the transition is still waiting.
    assert!(matches!(
        manager.status(),
        ViewportStatus::Transitioning { .. }
    ));

    world.puck.send(&PuckSample {
        coordinate: Coordinate::new(48.85, 2.35),
        heading: None,
        course: Some(90.0),
    });

    // First sample completed the transition and landed directly.
    let active: Arc<dyn ViewportState> = follow.clone();
    assert_eq!(manager.status(), ViewportStatus::Active(active));
    let displayed = world.sink.current_camera();
    assert_eq!(displayed.center, Some(Coordinate::new(48.85, 2.35)));
    assert_eq!(displayed.zoom, Some(15.0));
    assert_eq!(displayed.bearing, Some(90.0));

    // Once active, the state owns the camera and keeps tracking.
    world.puck.send(&PuckSample {
        coordinate: Coordinate::new(48.86, 2.36),
        heading: None,
        course: Some(91.0),
    });
    let displayed = world.sink.current_camera();
    assert_eq!(displayed.center, Some(Coordinate::new(48.86, 2.36)));
    assert_eq!(displayed.bearing, Some(91.0));

    // After idling, samples no longer land.
    manager.idle();
    let writes_before = world.sink.write_count();
    world.puck.send(&PuckSample::at(Coordinate::new(50.0, 3.0)));
    assert_eq!(world.sink.write_count(), writes_before);
}

#[test]
fn test_style_default_state_respects_safe_area() {
    let world = World::new();
    world
        .safe_area
        .send(&EdgeInsets::new(44.0, 0.0, 34.0, 0.0));
    let manager = ViewportManager::new(world.context.clone());

    let state = manager
        .make_state_from_style_default(r#"{"center": [-0.09, 51.505], "zoom": 12.0}"#)
        .unwrap();
    manager.transition_to(
        state,
        Some(Arc::new(viewport::EmptyViewportTransition)),
        None,
    );

    let displayed = world.sink.current_camera();
    assert_eq!(displayed.center, Some(Coordinate::new(51.505, -0.09)));
    assert_eq!(displayed.zoom, Some(12.0));
    assert_eq!(
        displayed.padding,
        Some(EdgeInsets::new(44.0, 0.0, 34.0, 0.0))
    );

    // A safe-area change while active re-frames the camera.
    world.safe_area.send(&EdgeInsets::new(20.0, 0.0, 0.0, 0.0));
    assert_eq!(
        world.sink.current_camera().padding,
        Some(EdgeInsets::new(20.0, 0.0, 0.0, 0.0))
    );
}

#[test]
fn test_overview_reframes_while_active() {
    let world = World::new();
    let manager = ViewportManager::new(world.context.clone());

    let overview = manager
        .make_overview_state(OverviewViewportStateOptions::for_geometry(vec![
            Coordinate::new(10.0, 10.0),
        ]))
        .unwrap();
    manager.transition_to(
        overview.clone(),
        Some(Arc::new(viewport::EmptyViewportTransition)),
        None,
    );
    assert_eq!(
        world.sink.current_camera().center,
        Some(Coordinate::new(10.0, 10.0))
    );

    overview
        .set_options(OverviewViewportStateOptions::for_geometry(vec![
            Coordinate::new(20.0, 20.0),
            Coordinate::new(22.0, 22.0),
        ]))
        .unwrap();
    let displayed = world.sink.current_camera();
    assert_eq!(displayed.center, Some(Coordinate::new(21.0, 21.0)));
    assert_eq!(displayed.zoom, Some(14.0));
}

#[test]
fn test_default_transition_runs_phases_and_activates() {
    let world = World::with_camera(
        Camera::empty()
            .with_center(Coordinate::new(0.0, 0.0))
            .with_zoom(12.0)
            .with_padding(EdgeInsets::default()),
    );
    let manager = ViewportManager::new(world.context.clone());

    // The overview frames at zoom 14.5, above the displayed 12: the pan
    // leads and the zoom-in follows.
    let overview = manager
        .make_overview_state(OverviewViewportStateOptions::for_geometry(vec![
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.5, 2.5),
        ]))
        .unwrap();

    manager.transition_to(overview.clone(), None, None);

    let animations = world.animator.pending_animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(animations[0].target.zoom, None);
    assert_eq!(
        animations[0].target.center,
        Some(Coordinate::new(1.75, 1.75))
    );
    assert_eq!(animations[0].delay, Duration::ZERO);
    assert_eq!(animations[1].target.zoom, Some(14.5));
    assert!(animations[1].delay > Duration::ZERO);

    world.animator.finish_all(true);
    let active: Arc<dyn ViewportState> = overview.clone();
    assert_eq!(manager.status(), ViewportStatus::Active(active));
    assert_eq!(
        world.sink.current_camera().center,
        Some(Coordinate::new(1.75, 1.75))
    );
}
