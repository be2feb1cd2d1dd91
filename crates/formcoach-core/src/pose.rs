// ABOUTME: Pose frame construction from raw detector output with visibility filtering
// ABOUTME: Produces raw and hip-centered landmark sets scaled by shoulder width
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pose Frames
//!
//! A `PoseFrame` is built once per detector result and never mutated. When the
//! detector found nothing, or returned an array of the wrong length, the frame
//! is marked invalid with every slot absent. Consumers treat that as a
//! "pose lost" signal rather than an error.
//!
//! Body-normalized coordinates are centered on the hip midpoint and divided by
//! the horizontal shoulder span (hip span when a shoulder is missing), which
//! makes downstream thresholds independent of camera distance.

use crate::constants::pose::{
    DEFAULT_VISIBILITY_THRESHOLD, FALLBACK_SCALE, MIN_NORMALIZATION_SCALE,
};
use crate::landmarks::{Landmark, LandmarkName, LandmarkSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pose frame construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Landmarks with visibility strictly below this are dropped
    pub visibility_threshold: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// Source image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageSize {
    /// Create an image size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Landmarks for a single detector result
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
    timestamp: f64,
    image_size: ImageSize,
    raw: LandmarkSet,
    normalized: LandmarkSet,
    valid: bool,
}

impl PoseFrame {
    /// Build a frame from a detector result
    ///
    /// `landmarks` must hold exactly [`LandmarkName::COUNT`] entries in schema
    /// order. `None` or a wrong-sized array yields an invalid frame.
    #[must_use]
    pub fn from_detection(
        landmarks: Option<&[Landmark]>,
        timestamp: f64,
        image_size: ImageSize,
        config: &PoseConfig,
    ) -> Self {
        let Some(landmarks) = landmarks else {
            return Self::invalid(timestamp, image_size);
        };

        if landmarks.len() != LandmarkName::COUNT {
            warn!(
                received = landmarks.len(),
                expected = LandmarkName::COUNT,
                "Discarding detector output with unexpected landmark count"
            );
            return Self::invalid(timestamp, image_size);
        }

        let mut raw = LandmarkSet::empty();
        for (name, landmark) in LandmarkName::ALL.iter().zip(landmarks) {
            if landmark.visibility >= config.visibility_threshold {
                raw.set(*name, Some(*landmark));
            }
        }

        Self::from_landmarks(raw, timestamp, image_size)
    }

    /// Build a valid frame from an already-filtered landmark set
    #[must_use]
    pub fn from_landmarks(raw: LandmarkSet, timestamp: f64, image_size: ImageSize) -> Self {
        let normalized = normalize(&raw);
        Self {
            timestamp,
            image_size,
            raw,
            normalized,
            valid: true,
        }
    }

    /// The "pose not found" frame: invalid, every slot absent
    #[must_use]
    pub const fn invalid(timestamp: f64, image_size: ImageSize) -> Self {
        Self {
            timestamp,
            image_size,
            raw: LandmarkSet::empty(),
            normalized: LandmarkSet::empty(),
            valid: false,
        }
    }

    /// Capture time in seconds
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Source image dimensions
    #[must_use]
    pub const fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Landmarks in detector (normalized image) space
    #[must_use]
    pub const fn raw(&self) -> &LandmarkSet {
        &self.raw
    }

    /// Landmarks in body-relative space
    #[must_use]
    pub const fn normalized(&self) -> &LandmarkSet {
        &self.normalized
    }

    /// Whether the frame may be used for measurement
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Raw landmark lookup
    #[must_use]
    pub const fn landmark(&self, name: LandmarkName) -> Option<Landmark> {
        self.raw.get(name)
    }
}

/// Re-center on the hip midpoint and rescale by shoulder (or hip) span
///
/// Without both hips the raw values are mirrored unchanged.
fn normalize(raw: &LandmarkSet) -> LandmarkSet {
    let (Some(left_hip), Some(right_hip)) = (
        raw.get(LandmarkName::LeftHip),
        raw.get(LandmarkName::RightHip),
    ) else {
        return raw.clone();
    };

    let center_x = (left_hip.x + right_hip.x) / 2.0;
    let center_y = (left_hip.y + right_hip.y) / 2.0;

    let span = match (
        raw.get(LandmarkName::LeftShoulder),
        raw.get(LandmarkName::RightShoulder),
    ) {
        (Some(left), Some(right)) => (left.x - right.x).abs(),
        _ => (left_hip.x - right_hip.x).abs(),
    };
    let scale = if span < MIN_NORMALIZATION_SCALE {
        FALLBACK_SCALE
    } else {
        span
    };

    raw.map_present(|lm| {
        Landmark::new(
            (lm.x - center_x) / scale,
            (lm.y - center_y) / scale,
            lm.z / scale,
            lm.visibility,
        )
    })
}
