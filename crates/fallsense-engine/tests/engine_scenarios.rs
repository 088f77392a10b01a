//! End-to-end scenarios through the engine facade: raw keypoint pairs in,
//! posture labels and confirmed-fall events out.

use fallsense_engine::prelude::*;

const LEFT_SHOULDER: usize = 5;
const RIGHT_SHOULDER: usize = 6;
const LEFT_HIP: usize = 11;
const RIGHT_HIP: usize = 12;
const LEFT_KNEE: usize = 13;
const RIGHT_KNEE: usize = 14;
const LEFT_ANKLE: usize = 15;
const RIGHT_ANKLE: usize = 16;

fn ts(secs: f64) -> Timestamp {
    Timestamp::from_secs_f64(secs)
}

/// Horizontal body with ankles drawn in next to the hips.
fn lying_pairs() -> Vec<(f32, f32)> {
    let mut pairs = vec![(1.0, 1.0); 17];
    pairs[LEFT_SHOULDER] = (50.0, 100.0);
    pairs[RIGHT_SHOULDER] = (50.0, 110.0);
    pairs[LEFT_HIP] = (150.0, 100.0);
    pairs[RIGHT_HIP] = (150.0, 110.0);
    pairs[LEFT_KNEE] = (158.0, 100.0);
    pairs[RIGHT_KNEE] = (158.0, 110.0);
    pairs[LEFT_ANKLE] = (165.0, 100.0);
    pairs[RIGHT_ANKLE] = (165.0, 110.0);
    pairs
}

/// Upright torso with a wide knee angle.
fn standing_pairs() -> Vec<(f32, f32)> {
    let mut pairs = vec![(1.0, 1.0); 17];
    pairs[LEFT_SHOULDER] = (95.0, 50.0);
    pairs[RIGHT_SHOULDER] = (105.0, 50.0);
    pairs[LEFT_HIP] = (95.0, 150.0);
    pairs[RIGHT_HIP] = (105.0, 150.0);
    pairs[LEFT_KNEE] = (95.0, 200.0);
    pairs[RIGHT_KNEE] = (105.0, 200.0);
    pairs[LEFT_ANKLE] = (135.0, 160.0);
    pairs[RIGHT_ANKLE] = (145.0, 160.0);
    pairs
}

#[test]
fn fall_is_confirmed_after_two_seconds_of_lying() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(7);
    let pairs = lying_pairs();

    for at in [0.0, 0.5, 1.0, 1.5] {
        let a = engine.process(person, &pairs, ts(at)).unwrap();
        assert_eq!(a.posture, PostureLabel::Lying, "at t={at}");
        assert!(!a.fall_confirmed, "at t={at}");
        assert!(a.event.is_none(), "at t={at}");
    }

    let confirming = engine.process(person, &pairs, ts(2.0)).unwrap();
    assert!(confirming.fall_confirmed);
    let event = confirming.event.expect("confirming frame carries the event");
    assert_eq!(event.person_id, person);
    assert!((event.lying_duration_secs - 2.0).abs() < 1e-9);

    // Still confirmed afterwards, but the event fired once.
    let later = engine.process(person, &pairs, ts(2.5)).unwrap();
    assert!(later.fall_confirmed);
    assert!(later.event.is_none());
}

#[test]
fn standing_up_resets_the_confirmation_clock() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(1);

    engine.process(person, &lying_pairs(), ts(0.0)).unwrap();
    engine.process(person, &lying_pairs(), ts(1.5)).unwrap();

    let recovered = engine.process(person, &standing_pairs(), ts(1.8)).unwrap();
    assert_eq!(recovered.posture, PostureLabel::Standing);
    assert!(!recovered.fall_confirmed);

    // A second fall produces a second event, timed from its own start.
    assert!(!engine.process(person, &lying_pairs(), ts(2.0)).unwrap().fall_confirmed);
    assert!(engine.process(person, &lying_pairs(), ts(4.0)).unwrap().event.is_some());
}

#[test]
fn missing_keypoints_yield_unknown_and_interrupt_the_episode() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(2);

    engine.process(person, &lying_pairs(), ts(0.0)).unwrap();

    let mut occluded = lying_pairs();
    occluded[LEFT_HIP] = (0.0, 0.0);
    let a = engine.process(person, &occluded, ts(1.0)).unwrap();
    assert_eq!(a.posture, PostureLabel::Unknown);
    assert!(a.features.is_none());

    // Timing restarts: 2.0 s after the first frame is not enough anymore.
    assert!(!engine.process(person, &lying_pairs(), ts(2.0)).unwrap().fall_confirmed);
    assert!(engine.process(person, &lying_pairs(), ts(4.0)).unwrap().fall_confirmed);
}

#[test]
fn malformed_frames_are_rejected_without_touching_state() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(3);

    engine.process(person, &lying_pairs(), ts(0.0)).unwrap();

    let err = engine.process(person, &[(1.0, 2.0); 4], ts(1.0)).unwrap_err();
    assert!(err.is_recoverable());

    let mut non_finite = lying_pairs();
    non_finite[LEFT_ANKLE] = (f32::NAN, 5.0);
    assert!(engine.process(person, &non_finite, ts(1.5)).is_err());

    // The episode that started at t=0 is still intact.
    assert!(engine.process(person, &lying_pairs(), ts(2.0)).unwrap().fall_confirmed);
}

#[test]
fn persons_in_one_frame_are_tracked_independently() {
    let engine = FallEngine::with_defaults();
    let fallen = PersonId::new(10);
    let walker = PersonId::new(11);

    let lying = KeypointSet::from_pairs(&lying_pairs()).unwrap();
    let standing = KeypointSet::from_pairs(&standing_pairs()).unwrap();

    for at in [0.0, 1.0, 2.0, 3.0] {
        let detections = vec![(fallen, lying.clone()), (walker, standing.clone())];
        let assessments = engine.process_frame(&detections, ts(at));
        assert_eq!(assessments.len(), 2);

        let by_walker = assessments.iter().find(|a| a.person_id == walker).unwrap();
        assert!(!by_walker.fall_confirmed);

        let by_fallen = assessments.iter().find(|a| a.person_id == fallen).unwrap();
        assert_eq!(by_fallen.fall_confirmed, at >= 2.0);
    }

    assert_eq!(engine.tracked_count(), 2);
}

#[test]
fn departure_drops_the_track() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(4);

    engine.process(person, &lying_pairs(), ts(0.0)).unwrap();
    assert!(engine.person_departed(person));
    assert_eq!(engine.tracked_count(), 0);

    // Reappearing starts over.
    assert!(!engine.process(person, &lying_pairs(), ts(2.5)).unwrap().fall_confirmed);
}

#[test]
fn assessments_serialize_to_json() {
    let engine = FallEngine::with_defaults();
    let person = PersonId::new(42);

    engine.process(person, &lying_pairs(), ts(0.0)).unwrap();
    let confirming = engine.process(person, &lying_pairs(), ts(2.0)).unwrap();

    let json = serde_json::to_string(&confirming).unwrap();
    assert!(json.contains("\"Lying\""));
    assert!(json.contains("\"fall_confirmed\":true"));

    let back: FrameAssessment = serde_json::from_str(&json).unwrap();
    assert_eq!(back, confirming);
}

#[test]
fn custom_fall_duration_is_honored() {
    let config = EngineConfig::builder().fall_duration_secs(0.5).build().unwrap();
    let engine = FallEngine::new(config).unwrap();
    let person = PersonId::new(5);

    assert!(!engine.process(person, &lying_pairs(), ts(0.0)).unwrap().fall_confirmed);
    assert!(engine.process(person, &lying_pairs(), ts(0.5)).unwrap().fall_confirmed);
}
