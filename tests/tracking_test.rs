use boxtrack_rs::{BoxTracker, CostModel, Detection, MotionModel, Rect, TrackerConfig};

fn det(x: f32, y: f32, w: f32, h: f32) -> Detection {
    Detection::from_rect(Rect::new(x, y, w, h), 0.9)
}

#[test]
fn test_identity_stability() {
    let mut tracker = BoxTracker::new(TrackerConfig::strict()).unwrap();

    // One smoothly moving object: the same id must follow it every frame.
    for frame in 0..30 {
        let x = 10.0 + frame as f32 * 2.0;
        tracker.update(&[det(x, 10.0, 20.0, 20.0)]);
        assert_eq!(tracker.tracks().len(), 1, "frame {frame}");
        assert_eq!(tracker.tracks()[0].id(), 0, "frame {frame}");
    }
}

#[test]
fn test_deletion_timing() {
    let mut config = TrackerConfig::strict();
    config.deletion_threshold = 3;
    let mut tracker = BoxTracker::new(config).unwrap();

    tracker.update(&[det(10.0, 10.0, 20.0, 20.0)]);
    assert_eq!(tracker.tracks().len(), 1);

    // The track coasts while the miss count has not exceeded the threshold...
    for miss in 1..=3 {
        tracker.update(&[]);
        assert_eq!(tracker.tracks().len(), 1, "after miss {miss}");
        assert_eq!(tracker.tracks()[0].undetected_count(), miss);
        assert_eq!(tracker.tracks()[0].score(), 0.0, "coasting score");
    }

    // ...and is deleted on the first frame the count goes above it.
    tracker.update(&[]);
    assert!(tracker.tracks().is_empty());
}

#[test]
fn test_concrete_scenario() {
    // deletion_threshold = 2 is the strict profile default.
    let mut tracker = BoxTracker::new(TrackerConfig::strict()).unwrap();

    // Frame 1: a detection creates track id 0.
    tracker.update(&[det(10.0, 10.0, 20.0, 20.0)]);
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].id(), 0);

    // Frame 2: a nearby detection updates track 0, never creating id 1.
    tracker.update(&[det(12.0, 10.0, 20.0, 20.0)]);
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].id(), 0);
    assert!(tracker.tracks()[0].score() > 0.0);

    // Frame 3: no detections, track 0 coasts with score forced to zero.
    tracker.update(&[]);
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].id(), 0);
    assert_eq!(tracker.tracks()[0].score(), 0.0);

    // Frame 4: still within the coasting budget.
    tracker.update(&[]);
    assert_eq!(tracker.tracks().len(), 1);

    // Frame 5: two consecutive misses exceeded, track 0 is gone.
    tracker.update(&[]);
    assert!(tracker.tracks().is_empty());
}

#[test]
fn test_gating_blocks_far_detections() {
    let mut config = TrackerConfig::strict();
    config.cost = CostModel {
        appearance_weight: 0.5,
        ..CostModel::default()
    };
    let mut tracker = BoxTracker::new(config).unwrap();

    let seed = Detection::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0), 0.9)
        .with_embedding(vec![1.0, 0.0, 0.0]);
    tracker.update(&[seed]);
    assert_eq!(tracker.tracks().len(), 1);

    // A detection far beyond the distance gate must spawn a new track, even
    // with an identical embedding.
    let far = Detection::from_rect(Rect::new(600.0, 600.0, 20.0, 20.0), 0.9)
        .with_embedding(vec![1.0, 0.0, 0.0]);
    tracker.update(&[far]);

    let ids: Vec<u64> = tracker.tracks().iter().map(|t| t.id()).collect();
    assert!(ids.contains(&1), "far detection must get a new id: {ids:?}");
    let new_track = tracker.tracks().iter().find(|t| t.id() == 1).unwrap();
    assert_eq!(new_track.rect().x, 600.0);
}

#[test]
fn test_class_mismatch_never_matches_at_low_overlap() {
    let mut tracker = BoxTracker::new(TrackerConfig::strict()).unwrap();

    tracker.update(&[det(10.0, 10.0, 20.0, 20.0).with_class(1, "person")]);

    // Same neighbourhood, different class: the track coasts and the
    // detection starts a new identity.
    tracker.update(&[det(16.0, 10.0, 20.0, 20.0).with_class(2, "dog")]);
    assert_eq!(tracker.tracks().len(), 2);

    let person = tracker.tracks().iter().find(|t| t.id() == 0).unwrap();
    assert_eq!(person.score(), 0.0);
    assert_eq!(person.class_id(), 1);
}

#[test]
fn test_appearance_disambiguates_equal_overlap() {
    let mut config = TrackerConfig::strict();
    config.cost = CostModel {
        appearance_weight: 0.4,
        ..CostModel::default()
    };
    let mut tracker = BoxTracker::new(config).unwrap();

    let seed = Detection::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0), 0.9)
        .with_embedding(vec![1.0, 0.0, 0.0]);
    tracker.update(&[seed]);

    // Two candidates with symmetric overlap; only the embedding breaks the
    // tie, and it must pull the track towards the matching one.
    let imposter = Detection::from_rect(Rect::new(14.0, 10.0, 20.0, 20.0), 0.9)
        .with_embedding(vec![0.0, 1.0, 0.0]);
    let same_object = Detection::from_rect(Rect::new(6.0, 10.0, 20.0, 20.0), 0.9)
        .with_embedding(vec![1.0, 0.0, 0.0]);
    tracker.update(&[imposter, same_object]);

    assert_eq!(tracker.tracks().len(), 2);
    let original = tracker.tracks().iter().find(|t| t.id() == 0).unwrap();
    let matched_raw = original.history().back().unwrap().rect_raw;
    assert_eq!(matched_raw.x, 6.0, "track 0 must follow its own appearance");
}

#[test]
fn test_reid_profile_survives_long_occlusion() {
    let mut tracker = BoxTracker::new(TrackerConfig::reid()).unwrap();

    for frame in 0..5 {
        tracker.update(&[det(10.0 + frame as f32, 10.0, 20.0, 20.0)]);
    }
    assert_eq!(tracker.tracks().len(), 1);

    // 20 empty frames: far below the re-identification deletion budget.
    for _ in 0..20 {
        tracker.update(&[]);
    }
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].id(), 0);

    // The object comes back near the coasted prediction and is re-acquired
    // under its old identity.
    let coasted = tracker.tracks()[0].rect();
    tracker.update(&[det(coasted.x, coasted.y, 20.0, 20.0)]);
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].id(), 0);
    assert!(tracker.tracks()[0].score() > 0.0);
}

#[test]
fn test_crossing_objects_keep_ids_with_joint_filter() {
    let mut config = TrackerConfig::strict();
    config.motion_model = MotionModel::Joint;
    config.deletion_threshold = 3;
    let mut tracker = BoxTracker::new(config).unwrap();

    // Two objects on parallel lanes moving in opposite directions.
    for frame in 0..20 {
        let t = frame as f32;
        tracker.update(&[
            det(10.0 + 5.0 * t, 10.0, 16.0, 16.0),
            det(110.0 - 5.0 * t, 40.0, 16.0, 16.0),
        ]);
        assert_eq!(tracker.tracks().len(), 2, "frame {frame}");
    }

    let right_mover = tracker.tracks().iter().find(|t| t.id() == 0).unwrap();
    let left_mover = tracker.tracks().iter().find(|t| t.id() == 1).unwrap();
    assert!(right_mover.rect().x > left_mover.rect().x);
}

#[test]
fn test_history_records_trajectory() {
    let mut config = TrackerConfig::strict();
    config.history_len = 10;
    let mut tracker = BoxTracker::new(config).unwrap();

    for frame in 0..25 {
        tracker.update(&[det(10.0 + frame as f32, 10.0, 20.0, 20.0)]);
    }

    let track = &tracker.tracks()[0];
    assert_eq!(track.history().len(), 10);
    // Oldest-first ordering for trajectory drawing.
    let xs: Vec<f32> = track.history().iter().map(|d| d.rect_raw.x).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
}
