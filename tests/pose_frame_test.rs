// ABOUTME: Integration tests for pose frame construction, geometry helpers, and pose history
// ABOUTME: Validates normalization, visibility filtering, invalid frames, and history windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use formcoach_core::geometry::{angle_degrees, distance, velocity};
use formcoach_core::{ImageSize, Landmark, LandmarkName, PoseConfig, PoseFrame, PoseHistory};
use helpers::synthetic_pose::{PoseBuilder, IMAGE};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn torso() -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.4, 0.3)
        .point(LandmarkName::RightShoulder, 0.6, 0.3)
        .point(LandmarkName::LeftHip, 0.45, 0.6)
        .point(LandmarkName::RightHip, 0.55, 0.6)
}

#[test]
fn test_normalized_coordinates_center_on_hips_and_scale_by_shoulders() {
    let frame = torso()
        .point(LandmarkName::Nose, 0.5, 0.2)
        .frame(0.0);

    let nose = frame.normalized().get(LandmarkName::Nose).unwrap();
    // Hip midpoint (0.5, 0.6), shoulder span 0.2
    assert_close(nose.x, 0.0);
    assert_close(nose.y, -2.0);

    let left_shoulder = frame.normalized().get(LandmarkName::LeftShoulder).unwrap();
    assert_close(left_shoulder.x, -0.5);

    // Raw coordinates are untouched
    let raw_nose = frame.raw().get(LandmarkName::Nose).unwrap();
    assert_close(raw_nose.y, 0.2);
}

#[test]
fn test_hip_span_scales_when_a_shoulder_is_missing() {
    let frame = PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.4, 0.3)
        .point(LandmarkName::LeftHip, 0.45, 0.6)
        .point(LandmarkName::RightHip, 0.55, 0.6)
        .frame(0.0);

    let shoulder = frame.normalized().get(LandmarkName::LeftShoulder).unwrap();
    // Hip span 0.1
    assert_close(shoulder.x, -1.0);
    assert_close(shoulder.y, -3.0);
}

#[test]
fn test_collapsed_span_falls_back_to_unit_scale() {
    // Shoulders stacked on the same x, as in a pure side view
    let frame = PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.5, 0.3)
        .point(LandmarkName::RightShoulder, 0.5, 0.31)
        .point(LandmarkName::LeftHip, 0.45, 0.6)
        .point(LandmarkName::RightHip, 0.55, 0.6)
        .frame(0.0);

    let shoulder = frame.normalized().get(LandmarkName::LeftShoulder).unwrap();
    // Only re-centred on the hip midpoint (0.5, 0.6)
    assert_close(shoulder.x, 0.0);
    assert_close(shoulder.y, -0.3);

    // Missing shoulders and coincident hips
    let frame = PoseBuilder::new()
        .point(LandmarkName::Nose, 0.5, 0.2)
        .point(LandmarkName::LeftHip, 0.5, 0.6)
        .point(LandmarkName::RightHip, 0.5, 0.6)
        .frame(0.0);
    let nose = frame.normalized().get(LandmarkName::Nose).unwrap();
    assert_close(nose.x, 0.0);
    assert_close(nose.y, -0.4);
}

#[test]
fn test_visibility_threshold_is_inclusive() {
    let builder = torso()
        .point_visibility(LandmarkName::Nose, 0.5, 0.2, 0.5)
        .point_visibility(LandmarkName::LeftEar, 0.48, 0.2, 0.49);
    let frame = builder.frame(0.0);
    assert!(frame.landmark(LandmarkName::Nose).is_some());
    assert!(frame.landmark(LandmarkName::LeftEar).is_none());

    let strict = PoseFrame::from_detection(
        Some(builder.landmarks()),
        0.0,
        IMAGE,
        &PoseConfig {
            visibility_threshold: 0.9,
        },
    );
    assert!(strict.is_valid());
    assert!(strict.landmark(LandmarkName::Nose).is_none());
    assert!(strict.landmark(LandmarkName::LeftHip).is_some());
}

#[test]
fn test_missing_detection_is_invalid_with_every_slot_absent() {
    let frame = PoseFrame::from_detection(None, 4.2, IMAGE, &PoseConfig::default());
    assert!(!frame.is_valid());
    assert_close(frame.timestamp(), 4.2);
    assert_eq!(frame.raw().present_count(), 0);
    assert!(LandmarkName::ALL
        .iter()
        .all(|name| frame.normalized().get(*name).is_none()));
}

#[test]
fn test_wrong_sized_detection_is_invalid() {
    let landmarks = vec![Landmark::at(0.5, 0.5); LandmarkName::COUNT + 1];
    let frame = PoseFrame::from_detection(
        Some(&landmarks),
        0.0,
        ImageSize::new(320, 240),
        &PoseConfig::default(),
    );
    assert!(!frame.is_valid());
    assert_eq!(frame.image_size(), ImageSize::new(320, 240));
}

#[test]
fn test_joint_angle_and_degenerate_rays() {
    let straight = angle_degrees(
        Landmark::at(0.0, 0.0),
        Landmark::at(0.5, 0.0),
        Landmark::at(1.0, 0.0),
    );
    assert_close(straight, 180.0);

    let degenerate = angle_degrees(
        Landmark::at(0.5, 0.5),
        Landmark::at(0.5, 0.5),
        Landmark::at(1.0, 0.0),
    );
    assert_close(degenerate, 0.0);

    assert_close(
        distance(Landmark::at(0.0, 0.0), Landmark::at(0.3, 0.4)),
        0.5,
    );
}

#[test]
fn test_velocity_needs_positive_time_delta() {
    assert_eq!(velocity(0.5, 1.0, 0.6, 1.0), None);
    assert_eq!(velocity(0.5, 2.0, 0.6, 1.0), None);
    let v = velocity(0.5, 1.0, 0.3, 1.5).unwrap();
    assert_close(v, -0.4);
}

#[test]
fn test_history_evicts_oldest_frames() {
    let mut history = PoseHistory::new(3);
    for i in 0..5 {
        history.push(torso().frame(f64::from(i)));
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.capacity(), 3);
    let timestamps: Vec<f64> = history.iter().map(PoseFrame::timestamp).collect();
    assert_eq!(timestamps, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_history_windows_and_latest_valid() {
    let mut history = PoseHistory::new(10);
    history.push(torso().frame(0.0));
    history.push(torso().frame(0.5));
    history.push(PoseFrame::invalid(1.0, IMAGE));

    assert!(!history.latest().unwrap().is_valid());
    assert_close(history.latest_valid().unwrap().timestamp(), 0.5);
    assert_eq!(history.within(0.5).len(), 2);
    assert_eq!(history.recent(2).len(), 2);
    assert_close(history.recent(2)[0].timestamp(), 0.5);

    history.clear();
    assert!(history.is_empty());
    assert!(history.within(1.0).is_empty());
}
