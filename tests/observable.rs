//! Observable-core chains as the states use them.

use parking_lot::Mutex;
use std::sync::Arc;
use viewport::{Camera, Coordinate, CurrentValueSubject, EdgeInsets, Subject};

#[test]
fn test_camera_pipeline_combines_and_deduplicates() {
    // The shape every state builds: a data source combined with a
    // current-value configuration, mapped to cameras, repeats dropped.
    let centers: Subject<Coordinate> = Subject::new();
    let zoom = CurrentValueSubject::with_initial(10.0f64);

    let cameras = centers
        .signal()
        .combine_latest(&zoom.signal())
        .map(|(center, zoom)| Camera::empty().with_center(*center).with_zoom(*zoom))
        .skip_repeats();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let _sub = cameras.observe(move |camera: &Camera| {
        s.lock().push(camera.clone());
        true
    });

    // Nothing until the data source emits.
    assert!(seen.lock().is_empty());

    centers.send(&Coordinate::new(1.0, 1.0));
    centers.send(&Coordinate::new(1.0, 1.0)); // duplicate dropped
    zoom.send(&12.0);
    centers.send(&Coordinate::new(2.0, 2.0));

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].zoom, Some(10.0));
    assert_eq!(seen[1].zoom, Some(12.0));
    assert_eq!(seen[2].center, Some(Coordinate::new(2.0, 2.0)));
}

#[test]
fn test_blocked_while_pauses_camera_emission_during_batch() {
    // Batched updates: camera emission pauses while the batch flag is
    // up, then the last value from the batch is replayed.
    let cameras: Subject<Camera> = Subject::new();
    let batching = CurrentValueSubject::with_initial(false);

    let gated = cameras.signal().blocked_while(&batching.signal());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let _sub = gated.observe(move |camera: &Camera| {
        s.lock().push(camera.zoom);
        true
    });

    cameras.send(&Camera::empty().with_zoom(1.0));
    batching.send(&true);
    cameras.send(&Camera::empty().with_zoom(2.0));
    cameras.send(&Camera::empty().with_zoom(3.0));
    assert_eq!(*seen.lock(), vec![Some(1.0)]);

    batching.send(&false);
    assert_eq!(*seen.lock(), vec![Some(1.0), Some(3.0)]);

    cameras.send(&Camera::empty().with_zoom(4.0));
    assert_eq!(*seen.lock(), vec![Some(1.0), Some(3.0), Some(4.0)]);
}

#[test]
fn test_two_subscribers_share_subject_emissions() {
    let insets = CurrentValueSubject::with_initial(EdgeInsets::default());
    let signal = insets.signal();

    let first = Arc::new(Mutex::new(0));
    let second = Arc::new(Mutex::new(0));

    let f = first.clone();
    let _sub_a = signal.observe(move |_: &EdgeInsets| {
        *f.lock() += 1;
        true
    });
    insets.send(&EdgeInsets::new(1.0, 0.0, 0.0, 0.0));

    // The late subscriber catches up through replay, then both track.
    let sec = second.clone();
    let _sub_b = signal.observe(move |_: &EdgeInsets| {
        *sec.lock() += 1;
        true
    });
    assert_eq!(*second.lock(), 1);

    insets.send(&EdgeInsets::new(2.0, 0.0, 0.0, 0.0));
    assert_eq!(*first.lock(), 3);
    assert_eq!(*second.lock(), 2);
}

#[test]
fn test_handler_self_unsubscribe_mid_chain() {
    // A one-shot observer downstream of a combinator releases the whole
    // chain when it returns false.
    let source: Subject<i32> = Subject::new();
    let mapped = source.signal().map(|v: &i32| v + 1);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let _sub = mapped.observe(move |v: &i32| {
        s.lock().push(*v);
        false
    });

    source.send(&1);
    source.send(&2);
    assert_eq!(*seen.lock(), vec![2]);
    assert_eq!(source.observer_count(), 0);
}
