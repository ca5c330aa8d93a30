//! Behavioral scenarios for the tracker, driven through `HandTracker::update`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

use handosc::{HandTracker, RecordingTarget, RenderAdapter};
use handosc_core::{Hand, Pose, Quaternion, SharedPoseStore, Vec3};
use handosc_networking::{InboundMessage, OscArg, RouteOutcome};
use rand::{Rng, SeedableRng};

fn inbox(messages: impl IntoIterator<Item = InboundMessage>) -> VecDeque<InboundMessage> {
    messages.into_iter().collect()
}

fn assert_unit(q: Quaternion) {
    assert!((q.length() - 1.0).abs() < 1e-5, "not unit: {q:?}");
    assert!(q.is_finite());
}

#[test]
fn test_right_position_scenario() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([InboundMessage::floats("/hand/right/position", &[1.0, 2.0, 3.0])]));

    let snap = tracker.snapshot();
    assert_eq!(snap.right.position, Vec3::new(1.0, -2.0, 3.0));
    assert_eq!(snap.left, Pose::IDENTITY);
    assert_eq!(snap.right.orientation, Quaternion::IDENTITY);
}

#[test]
fn test_left_identity_orientation_scenario() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([InboundMessage::floats("/hand/left/orientation", &[1.0, 0.0, 0.0, 0.0])]));

    assert_eq!(tracker.snapshot().left.orientation, Quaternion::IDENTITY);
}

#[test]
fn test_degenerate_orientation_falls_back_to_identity() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([InboundMessage::floats("/hand/left/orientation", &[1.0, 0.0, 0.0, 0.0])]));
    tracker.update(&mut inbox([
        InboundMessage::floats("/hand/right/orientation", &[0.0, 0.0, 1.0, 0.0]),
        InboundMessage::floats("/hand/right/orientation", &[0.0, 0.0, 0.0, 0.0]),
    ]));

    let q = tracker.snapshot().right.orientation;
    assert_eq!(q, Quaternion::IDENTITY);
    assert_unit(q);
}

#[test]
fn test_unknown_address_diagnostic_scenario() {
    let mut tracker = HandTracker::new();
    let before = tracker.snapshot();

    let outcome = tracker.on_message(&InboundMessage::new(
        "/foo/bar",
        vec![OscArg::Int32(5), OscArg::String("hi".into())],
    ));

    assert_eq!(
        outcome,
        RouteOutcome::Unrecognized {
            diagnostic: "/foo/bar: i32:5 string:hi".into()
        }
    );
    assert_eq!(tracker.snapshot(), before);
}

#[test]
fn test_last_write_wins_in_one_tick() {
    let mut tracker = HandTracker::new();
    let report = tracker.update(&mut inbox((1..=50).map(|i| {
        let v = i as f32;
        InboundMessage::floats("/hand/left/position", &[v, v, v])
    })));

    assert_eq!(report.positions, 50);
    assert_eq!(tracker.snapshot().left.position, Vec3::new(50.0, -50.0, 50.0));
}

#[test]
fn test_hands_and_fields_are_independent() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([
        InboundMessage::floats("/hand/left/position", &[1.0, 1.0, 1.0]),
        InboundMessage::floats("/hand/right/orientation", &[0.0, 1.0, 0.0, 0.0]),
    ]));

    let snap = tracker.snapshot();
    assert_eq!(snap.left.orientation, Quaternion::IDENTITY);
    assert_eq!(snap.right.position, Vec3::ZERO);
    assert_eq!(snap.right.orientation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
}

#[test]
fn test_malformed_keeps_prior_value() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([InboundMessage::floats("/hand/left/position", &[1.0, 2.0, 3.0])]));

    let report = tracker.update(&mut inbox([
        InboundMessage::floats("/hand/left/position", &[9.0, 9.0]),
        InboundMessage::new(
            "/hand/left/position",
            vec![OscArg::Float32(9.0), OscArg::String("y".into()), OscArg::Float32(9.0)],
        ),
        InboundMessage::floats("/hand/left/position", &[f32::NAN, 0.0, 0.0]),
    ]));

    assert_eq!(report.malformed, 3);
    assert_eq!(tracker.snapshot().left.position, Vec3::new(1.0, -2.0, 3.0));
}

#[test]
fn test_random_orientations_stay_unit() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x4841_4e44);
    let mut tracker = HandTracker::new();

    for _ in 0..500 {
        let args: [f32; 4] = [
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        ];
        tracker.on_message(&InboundMessage::floats("/hand/right/orientation", &args));
        assert_unit(tracker.snapshot().right.orientation);
    }
}

#[test]
fn test_shared_store_readers_see_whole_snapshots() {
    let shared = Arc::new(SharedPoseStore::new());
    let mut tracker = HandTracker::new().with_shared(Arc::clone(&shared));

    let reader = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            let mut last_generation = 0;
            for _ in 0..2_000 {
                let (generation, snap) = shared.read_with_generation();
                assert!(generation >= last_generation);
                last_generation = generation;
                // Both hands are always written together below.
                assert_eq!(snap.left.position.x, snap.right.position.x);
            }
        })
    };

    for i in 0..500 {
        let v = i as f32;
        tracker.update(&mut inbox([
            InboundMessage::floats("/hand/left/position", &[v, 0.0, 0.0]),
            InboundMessage::floats("/hand/right/position", &[v, 0.0, 0.0]),
        ]));
    }

    reader.join().unwrap();
    assert_eq!(shared.read().get(Hand::Right).position.x, 499.0);
}

#[test]
fn test_render_follows_tracker() {
    let mut tracker = HandTracker::new();
    tracker.update(&mut inbox([InboundMessage::floats("/hand/left/position", &[10.0, 0.0, 0.0])]));

    let mut target = RecordingTarget::default();
    RenderAdapter::default().render(&tracker.snapshot(), &mut target);

    let left = target.calls[1].transform.translation();
    assert!((left.x - 620.0).abs() < 1e-3);
    assert!((left.y - 600.0).abs() < 1e-3);
}
