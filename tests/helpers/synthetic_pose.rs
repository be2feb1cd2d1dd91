// ABOUTME: Synthetic pose generator for deterministic exercise counter tests
// ABOUTME: Builds full 33-slot detector outputs and common body positions from joint angles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use formcoach_core::{
    ImageSize, Landmark, LandmarkName, ManualClock, PoseConfig, PoseFrame, SharedClock,
};

/// Image size used by every synthetic frame
pub const IMAGE: ImageSize = ImageSize::new(640, 480);

/// Builder for detector output in schema order
///
/// Slots that are never placed have zero visibility and are filtered out
/// when the frame is built.
#[derive(Debug, Clone)]
pub struct PoseBuilder {
    landmarks: Vec<Landmark>,
}

impl Default for PoseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseBuilder {
    /// Start with every landmark hidden
    #[must_use]
    pub fn new() -> Self {
        Self {
            landmarks: vec![Landmark::new(0.0, 0.0, 0.0, 0.0); LandmarkName::COUNT],
        }
    }

    /// Place a fully visible landmark
    #[must_use]
    pub fn point(self, name: LandmarkName, x: f64, y: f64) -> Self {
        self.point_z(name, x, y, 0.0)
    }

    /// Place a fully visible landmark with depth
    #[must_use]
    pub fn point_z(mut self, name: LandmarkName, x: f64, y: f64, z: f64) -> Self {
        self.landmarks[name.index()] = Landmark::new(x, y, z, 1.0);
        self
    }

    /// Place a landmark with explicit visibility
    #[must_use]
    pub fn point_visibility(mut self, name: LandmarkName, x: f64, y: f64, visibility: f64) -> Self {
        self.landmarks[name.index()] = Landmark::new(x, y, 0.0, visibility);
        self
    }

    /// Raw detector output
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Build a frame with the default pose configuration
    #[must_use]
    pub fn frame(&self, timestamp: f64) -> PoseFrame {
        PoseFrame::from_detection(
            Some(&self.landmarks),
            timestamp,
            IMAGE,
            &PoseConfig::default(),
        )
    }
}

/// Manual clock plus the shared handle counters consume
#[must_use]
pub fn manual_clock(start: f64) -> (Arc<ManualClock>, SharedClock) {
    let clock = Arc::new(ManualClock::new(start));
    let shared: SharedClock = clock.clone();
    (clock, shared)
}

/// Point at `length` from `origin`, rotated `degrees` clockwise from straight down
fn from_joint(origin: (f64, f64), degrees: f64, length: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (
        length.mul_add(radians.sin(), origin.0),
        length.mul_add(radians.cos(), origin.1),
    )
}

/// Front-facing stance for jumping jacks
///
/// Hip width is 0.1. `arms_up` lifts the wrists well above the shoulders and
/// `legs_apart` spreads the ankles to 0.3.
#[must_use]
pub fn jack_pose(arms_up: bool, legs_apart: bool) -> PoseBuilder {
    let wrist_y = if arms_up { 0.15 } else { 0.5 };
    let ankle_offset = if legs_apart { 0.15 } else { 0.05 };
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.44, 0.3)
        .point(LandmarkName::RightShoulder, 0.56, 0.3)
        .point(LandmarkName::LeftWrist, 0.4, wrist_y)
        .point(LandmarkName::RightWrist, 0.6, wrist_y)
        .point(LandmarkName::LeftHip, 0.45, 0.55)
        .point(LandmarkName::RightHip, 0.55, 0.55)
        .point(LandmarkName::LeftAnkle, 0.5 - ankle_offset, 0.9)
        .point(LandmarkName::RightAnkle, 0.5 + ankle_offset, 0.9)
}

/// Both legs with the given knee angle
///
/// Knees stay fixed at height 0.7 and ankles at 0.9, so the hip lowers as the
/// knee bends. Straight legs put the hips at 0.5 with a leg length of 0.4.
#[must_use]
pub fn squat_pose(knee_angle: f64) -> PoseBuilder {
    let (left_hip_x, hip_y) = from_joint((0.45, 0.7), knee_angle, 0.2);
    let right_hip_x = 1.0 - left_hip_x;
    PoseBuilder::new()
        .point(LandmarkName::LeftHip, left_hip_x, hip_y)
        .point(LandmarkName::RightHip, right_hip_x, hip_y)
        .point(LandmarkName::LeftKnee, 0.45, 0.7)
        .point(LandmarkName::RightKnee, 0.55, 0.7)
        .point(LandmarkName::LeftAnkle, 0.45, 0.9)
        .point(LandmarkName::RightAnkle, 0.55, 0.9)
}

/// Side-view push-up position
///
/// Upper arm hangs 0.15 straight down from the shoulder; the forearm leaves
/// the elbow at `elbow_angle`. Hips sit at `hip_y`.
#[must_use]
pub fn pushup_pose(elbow_angle: f64, shoulder_y: f64, hip_y: f64) -> PoseBuilder {
    let mut builder = PoseBuilder::new();
    for (shoulder, elbow, wrist, x) in [
        (
            LandmarkName::LeftShoulder,
            LandmarkName::LeftElbow,
            LandmarkName::LeftWrist,
            0.30,
        ),
        (
            LandmarkName::RightShoulder,
            LandmarkName::RightElbow,
            LandmarkName::RightWrist,
            0.32,
        ),
    ] {
        let elbow_y = shoulder_y + 0.15;
        let (wrist_x, wrist_y) = from_joint((x, elbow_y), 180.0 - elbow_angle, 0.15);
        builder = builder
            .point(shoulder, x, shoulder_y)
            .point(elbow, x, elbow_y)
            .point(wrist, wrist_x, wrist_y);
    }
    builder
        .point(LandmarkName::LeftHip, 0.6, hip_y)
        .point(LandmarkName::RightHip, 0.62, hip_y)
}

/// Hanging from a bar at height 0.3 with the nose at `nose_y`
///
/// Wrists sit on the bar 0.2 apart; shoulders are 0.16 wide.
#[must_use]
pub fn hang_pose(nose_y: f64) -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::Nose, 0.5, nose_y)
        .point(LandmarkName::LeftShoulder, 0.42, nose_y + 0.1)
        .point(LandmarkName::RightShoulder, 0.58, nose_y + 0.1)
        .point(LandmarkName::LeftWrist, 0.4, 0.3)
        .point(LandmarkName::RightWrist, 0.6, 0.3)
}

/// Side view with shoulder, hip, and knee in a line (angle 180 at the hip)
#[must_use]
pub fn plank_pose() -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.3, 0.5)
        .point(LandmarkName::LeftHip, 0.5, 0.5)
        .point(LandmarkName::LeftKnee, 0.7, 0.5)
}

/// Side view with the hips piked (about 117 degrees at the hip)
#[must_use]
pub fn piked_pose() -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.3, 0.5)
        .point(LandmarkName::LeftHip, 0.5, 0.5)
        .point(LandmarkName::LeftKnee, 0.6, 0.7)
}
