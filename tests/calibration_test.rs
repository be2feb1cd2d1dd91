// ABOUTME: Integration tests for the passive calibration window
// ABOUTME: Covers window timing, skipped frames, sample minimums, medians, and the torso floor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use formcoach_core::constants::geometry::MIN_REFERENCE_LENGTH;
use formcoach_core::{LandmarkName, ManualClock, PoseFrame};
use formcoach_engine::{CalibrationConfig, CalibrationResult, PassiveCalibrator};
use helpers::synthetic_pose::{manual_clock, pushup_pose, PoseBuilder, IMAGE};

const SHOULDER_Y: f64 = 0.4;
const HIP_Y: f64 = 0.45;

fn top_pose(elbow_angle: f64) -> PoseBuilder {
    pushup_pose(elbow_angle, SHOULDER_Y, HIP_Y)
}

fn occluded_pose() -> PoseBuilder {
    top_pose(160.0).point_visibility(LandmarkName::RightWrist, 0.3, 0.7, 0.0)
}

struct Fixture {
    clock: Arc<ManualClock>,
    calibrator: PassiveCalibrator,
}

impl Fixture {
    fn new(config: CalibrationConfig) -> Self {
        let (clock, shared) = manual_clock(0.0);
        Self {
            clock,
            calibrator: PassiveCalibrator::new(config, shared),
        }
    }

    fn feed(&mut self, t: f64, pose: &PoseBuilder) -> Option<CalibrationResult> {
        self.clock.set(t);
        self.calibrator.update(&pose.frame(t))
    }
}

#[test]
fn test_window_starts_on_first_frame_even_when_joints_are_missing() {
    let mut fixture = Fixture::new(CalibrationConfig::default());

    assert!(fixture.feed(0.0, &occluded_pose()).is_none());
    assert_eq!(fixture.calibrator.sample_count(), 0);

    assert!(fixture.feed(1.0, &top_pose(160.0)).is_none());
    assert!(fixture.feed(2.0, &top_pose(160.0)).is_none());
    // Three seconds after the occluded frame, not after the first sample
    let result = fixture.feed(3.0, &top_pose(160.0)).unwrap();
    assert_eq!(fixture.calibrator.sample_count(), 3);
    assert!((result.top_elbow_angle - 160.0).abs() < 1e-6);
}

#[test]
fn test_lost_pose_does_not_start_the_window() {
    let mut fixture = Fixture::new(CalibrationConfig::default());

    fixture.clock.set(0.0);
    assert!(fixture
        .calibrator
        .update(&PoseFrame::invalid(0.0, IMAGE))
        .is_none());

    for t in [1.0, 2.0, 3.0] {
        assert!(fixture.feed(t, &top_pose(160.0)).is_none(), "t = {t}");
    }
    assert!(fixture.feed(4.0, &top_pose(160.0)).is_some());
}

#[test]
fn test_elapsed_window_waits_for_minimum_samples() {
    let mut fixture = Fixture::new(CalibrationConfig {
        duration_seconds: 1.0,
        min_samples: 5,
    });

    for t in [0.0, 0.5, 1.0, 1.5] {
        assert!(fixture.feed(t, &top_pose(160.0)).is_none(), "t = {t}");
    }
    assert_eq!(fixture.calibrator.sample_count(), 4);
    assert!(!fixture.calibrator.is_complete());

    assert!(fixture.feed(2.0, &top_pose(160.0)).is_some());
}

#[test]
fn test_medians_ignore_an_outlier_frame() {
    let mut fixture = Fixture::new(CalibrationConfig {
        duration_seconds: 1.0,
        min_samples: 3,
    });

    fixture.feed(0.0, &top_pose(158.0));
    fixture.feed(0.25, &top_pose(90.0));
    fixture.feed(0.5, &top_pose(162.0));
    fixture.feed(0.75, &top_pose(160.0));
    let result = fixture.feed(1.0, &top_pose(161.0)).unwrap();

    assert!((result.top_elbow_angle - 160.0).abs() < 1e-6);
    assert!((result.shoulder_y_top - SHOULDER_Y).abs() < 1e-9);
    assert!((result.hip_y_top - HIP_Y).abs() < 1e-9);
    // Left shoulder (0.30, 0.40) to left hip (0.60, 0.45)
    let expected_torso = 0.3_f64.hypot(0.05);
    assert!((result.torso_length - expected_torso).abs() < 1e-9);
}

#[test]
fn test_collapsed_torso_is_floored() {
    let mut fixture = Fixture::new(CalibrationConfig {
        duration_seconds: 0.5,
        min_samples: 1,
    });
    let collapsed = top_pose(160.0).point(LandmarkName::LeftHip, 0.30, SHOULDER_Y);

    assert!(fixture.feed(0.0, &collapsed).is_none());
    let result = fixture.feed(0.5, &collapsed).unwrap();
    assert!((result.torso_length - MIN_REFERENCE_LENGTH).abs() < f64::EPSILON);
}

#[test]
fn test_result_is_reported_once() {
    let mut fixture = Fixture::new(CalibrationConfig::default());
    let mut reported = Vec::new();
    for step in 0..10 {
        let t = f64::from(step) * 0.5;
        if let Some(result) = fixture.feed(t, &top_pose(160.0)) {
            reported.push((t, result));
        }
    }

    assert_eq!(reported.len(), 1);
    assert!((reported[0].0 - 3.0).abs() < f64::EPSILON);
    assert_eq!(fixture.calibrator.result(), Some(reported[0].1));
    // Frames after completion are not sampled
    assert_eq!(fixture.calibrator.sample_count(), 7);
}

#[test]
fn test_reset_starts_a_new_window() {
    let mut fixture = Fixture::new(CalibrationConfig::default());
    for t in [0.0, 1.5, 3.0] {
        fixture.feed(t, &top_pose(160.0));
    }
    assert!(fixture.calibrator.is_complete());

    fixture.calibrator.reset();
    assert!(!fixture.calibrator.is_complete());
    assert_eq!(fixture.calibrator.result(), None);
    assert_eq!(fixture.calibrator.sample_count(), 0);

    assert!(fixture.feed(10.0, &top_pose(150.0)).is_none());
    assert!(fixture.feed(11.5, &top_pose(150.0)).is_none());
    assert!(fixture.feed(12.9, &top_pose(150.0)).is_none());
    let result = fixture.feed(13.0, &top_pose(150.0)).unwrap();
    assert!((result.top_elbow_angle - 150.0).abs() < 1e-6);
}
