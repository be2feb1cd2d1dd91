// ABOUTME: Fixed 33-point body landmark schema and per-frame landmark storage
// ABOUTME: Landmark slots are optional so occluded or low-confidence points stay explicit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named body landmark, in detector output order
///
/// The discriminant is the index of the landmark in the detector's raw array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    /// Nose tip
    Nose = 0,
    /// Inner corner of the left eye
    LeftEyeInner = 1,
    /// Left eye center
    LeftEye = 2,
    /// Outer corner of the left eye
    LeftEyeOuter = 3,
    /// Inner corner of the right eye
    RightEyeInner = 4,
    /// Right eye center
    RightEye = 5,
    /// Outer corner of the right eye
    RightEyeOuter = 6,
    /// Left ear
    LeftEar = 7,
    /// Right ear
    RightEar = 8,
    /// Left mouth corner
    MouthLeft = 9,
    /// Right mouth corner
    MouthRight = 10,
    /// Left shoulder
    LeftShoulder = 11,
    /// Right shoulder
    RightShoulder = 12,
    /// Left elbow
    LeftElbow = 13,
    /// Right elbow
    RightElbow = 14,
    /// Left wrist
    LeftWrist = 15,
    /// Right wrist
    RightWrist = 16,
    /// Left pinky knuckle
    LeftPinky = 17,
    /// Right pinky knuckle
    RightPinky = 18,
    /// Left index knuckle
    LeftIndex = 19,
    /// Right index knuckle
    RightIndex = 20,
    /// Left thumb
    LeftThumb = 21,
    /// Right thumb
    RightThumb = 22,
    /// Left hip
    LeftHip = 23,
    /// Right hip
    RightHip = 24,
    /// Left knee
    LeftKnee = 25,
    /// Right knee
    RightKnee = 26,
    /// Left ankle
    LeftAnkle = 27,
    /// Right ankle
    RightAnkle = 28,
    /// Left heel
    LeftHeel = 29,
    /// Right heel
    RightHeel = 30,
    /// Left foot index (toe)
    LeftFootIndex = 31,
    /// Right foot index (toe)
    RightFootIndex = 32,
}

impl LandmarkName {
    /// Number of landmarks in the schema
    pub const COUNT: usize = 33;

    /// Every landmark in detector order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Position of this landmark in the raw detector array
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name used in logs and serialized output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkName {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CoreError::UnknownLandmark(s.to_owned()))
    }
}

/// A single landmark estimate for one frame
///
/// `x`/`y` are in the frame's coordinate space (normalized image space for raw
/// landmarks, body-relative units for normalized ones). `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position
    pub x: f64,
    /// Vertical position (positive is down)
    pub y: f64,
    /// Depth relative to the hips (smaller is closer to the camera)
    pub z: f64,
    /// Detector confidence in [0, 1]
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Create a fully visible landmark at depth zero
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }
}

/// One optional landmark per schema slot
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    slots: [Option<Landmark>; LandmarkName::COUNT],
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl LandmarkSet {
    /// A set with every slot absent
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slots: [None; LandmarkName::COUNT],
        }
    }

    /// Look up a landmark
    #[must_use]
    pub const fn get(&self, name: LandmarkName) -> Option<Landmark> {
        self.slots[name.index()]
    }

    /// Replace a slot
    pub fn set(&mut self, name: LandmarkName, landmark: Option<Landmark>) {
        self.slots[name.index()] = landmark;
    }

    /// Builder-style insert, convenient for assembling fixtures
    #[must_use]
    pub fn with(mut self, name: LandmarkName, landmark: Landmark) -> Self {
        self.set(name, Some(landmark));
        self
    }

    /// Listed landmarks that are absent, in the order given
    #[must_use]
    pub fn missing(&self, names: &[LandmarkName]) -> Vec<LandmarkName> {
        names
            .iter()
            .copied()
            .filter(|name| self.get(*name).is_none())
            .collect()
    }

    /// Fetch a fixed group of landmarks, or `None` if any member is absent
    #[must_use]
    pub fn group<const N: usize>(&self, names: [LandmarkName; N]) -> Option<[Landmark; N]> {
        let mut out = [Landmark::at(0.0, 0.0); N];
        for (slot, name) in out.iter_mut().zip(names) {
            *slot = self.get(name)?;
        }
        Some(out)
    }

    /// Number of present landmarks
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterate over every slot in schema order
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkName, Option<Landmark>)> + '_ {
        LandmarkName::ALL.iter().map(|name| (*name, self.get(*name)))
    }

    /// Apply a transform to every present landmark
    #[must_use]
    pub fn map_present(&self, transform: impl Fn(Landmark) -> Landmark) -> Self {
        let mut out = Self::empty();
        for (index, slot) in self.slots.iter().enumerate() {
            out.slots[index] = slot.map(&transform);
        }
        out
    }
}
