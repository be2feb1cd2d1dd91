// ABOUTME: Helpers shared by every exercise family
// ABOUTME: Warning text, left-first side selection, and consecutive-frame debouncing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formcoach_core::{Landmark, LandmarkName, LandmarkSet};
use serde::{Deserialize, Serialize};

/// User-facing warning strings
pub mod warnings {
    /// Frame carried no usable detection
    pub const NO_POSE: &str = "No pose detected";
    /// Full-body exercises with joints missing
    pub const BODY_NOT_FULLY_VISIBLE: &str = "Body not fully visible";
    /// Hold exercises with no complete landmark group
    pub const BODY_NOT_VISIBLE: &str = "Body not visible";
    /// Leg joints missing
    pub const LEGS_NOT_VISIBLE: &str = "Legs not visible";
    /// Arm joints missing
    pub const ARMS_NOT_VISIBLE: &str = "Arms not visible";
    /// Shoulder or hip joints missing
    pub const TORSO_NOT_VISIBLE: &str = "Torso not visible";
    /// Nose, wrist, or shoulder joints missing
    pub const UPPER_BODY_NOT_VISIBLE: &str = "Upper body not visible";
    /// Push-up arm joints missing
    pub const ARMS_SHOULDERS_NOT_VISIBLE: &str = "Arms/shoulders not visible";
    /// Waiting for a baseline
    pub const CALIBRATING: &str = "Calibrating...";
    /// No bar position available
    pub const BAR_NOT_FOUND: &str = "Bar not found";
    /// Invalid rep reached the end of its cycle
    pub const REP_NOT_COUNTED: &str = "Rep not counted";
    /// Hip line drifted for several consecutive frames
    pub const KEEP_HIPS_STABLE: &str = "Keep hips stable";
    /// Hip joints missing so stability could not be checked
    pub const HIPS_NOT_VISIBLE: &str = "Hips not visible (stability not checked)";
    /// Descent not deep enough
    pub const GO_LOWER: &str = "Go lower";
    /// Arms not high enough while open or up
    pub const RAISE_ARMS_HIGHER: &str = "Raise arms higher";
    /// Feet not wide enough while open
    pub const SPREAD_LEGS_WIDER: &str = "Spread legs wider";
    /// Knee not high enough while up
    pub const LIFT_KNEE_HIGHER: &str = "Lift knee higher";
    /// Side bend too shallow
    pub const BEND_FURTHER: &str = "Bend further";
    /// Sit-up start position not flat enough
    pub const LIE_BACK_FURTHER: &str = "Lie back further";
    /// Sit-up top position not high enough
    pub const COME_UP_HIGHER: &str = "Come up higher";
    /// Hands too close together on the bar
    pub const WIDER_GRIP: &str = "Wider grip for pull-ups";
    /// Hands too far apart for a chin-up
    pub const NARROWER_GRIP: &str = "Narrower grip for chin-ups";
    /// Face much closer to the camera than the shoulders
    pub const MOVE_BACK: &str = "Move back from camera";
    /// Wrists away from the bar line
    pub const KEEP_WRISTS_ON_BAR: &str = "Keep wrists on the bar";
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Subject's left
    Left,
    /// Subject's right
    Right,
}

/// Pick a fully visible side, preferring the left one
///
/// Returns `None` when neither group is complete.
#[must_use]
pub fn select_side<const N: usize>(
    landmarks: &LandmarkSet,
    left: [LandmarkName; N],
    right: [LandmarkName; N],
) -> Option<(Side, [Landmark; N])> {
    landmarks
        .group(left)
        .map(|points| (Side::Left, points))
        .or_else(|| landmarks.group(right).map(|points| (Side::Right, points)))
}

/// Requires `required` consecutive qualifying frames before firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    required: u32,
    count: u32,
}

impl Debounce {
    /// Create a debouncer; a requirement of 0 behaves like 1
    #[must_use]
    pub const fn new(required: u32) -> Self {
        Self { required, count: 0 }
    }

    /// Record one frame; returns `true` on the frame that completes the streak
    ///
    /// The streak restarts after firing and whenever a frame does not qualify.
    pub const fn observe(&mut self, qualifies: bool) -> bool {
        if !qualifies {
            self.count = 0;
            return false;
        }
        self.count += 1;
        if self.count >= self.required {
            self.count = 0;
            return true;
        }
        false
    }

    /// Forget the current streak
    pub const fn clear(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_needs_consecutive_frames() {
        let mut debounce = Debounce::new(2);
        assert!(!debounce.observe(true));
        assert!(!debounce.observe(false));
        assert!(!debounce.observe(true));
        assert!(debounce.observe(true));
        assert!(!debounce.observe(true));
    }

    #[test]
    fn test_select_side_prefers_left() {
        let set = LandmarkSet::empty()
            .with(LandmarkName::LeftHip, Landmark::at(0.4, 0.5))
            .with(LandmarkName::RightHip, Landmark::at(0.6, 0.5));
        let picked = select_side(&set, [LandmarkName::LeftHip], [LandmarkName::RightHip]);
        assert_eq!(picked.map(|(side, _)| side), Some(Side::Left));

        let right_only = LandmarkSet::empty().with(LandmarkName::RightHip, Landmark::at(0.6, 0.5));
        let picked = select_side(&right_only, [LandmarkName::LeftHip], [LandmarkName::RightHip]);
        assert_eq!(picked.map(|(side, _)| side), Some(Side::Right));
    }
}
