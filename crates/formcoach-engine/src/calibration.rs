// ABOUTME: Passive calibration establishing a per-session top-posture baseline
// ABOUTME: Collects elbow angle, shoulder/hip height, and torso length, then reports medians once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Passive Calibration
//!
//! Fixed absolute thresholds break across body proportions and camera angles,
//! so calibration-dependent exercises (push-ups) derive theirs from a short
//! sampling window at the start of a set.
//!
//! The window clock starts on the first valid frame and advances with wall
//! time, not with the number of usable samples. Frames missing any required
//! joint are skipped without contributing a sample.

use crate::errors::{EngineError, EngineResult};
use crate::stats::median;
use formcoach_core::constants::geometry::MIN_REFERENCE_LENGTH;
use formcoach_core::geometry::{angle_degrees, distance, midpoint};
use formcoach_core::{LandmarkName, PoseFrame, SharedClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Joints that must all be visible for a frame to be sampled
const REQUIRED_JOINTS: [LandmarkName; 8] = [
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
    LandmarkName::LeftElbow,
    LandmarkName::RightElbow,
    LandmarkName::LeftWrist,
    LandmarkName::RightWrist,
    LandmarkName::LeftHip,
    LandmarkName::RightHip,
];

/// Calibration window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Window length in seconds, measured from the first valid frame
    pub duration_seconds: f64,
    /// Fewest samples accepted when the window closes
    pub min_samples: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 3.0,
            min_samples: 3,
        }
    }
}

impl CalibrationConfig {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` for a non-positive window.
    pub fn validate(&self) -> EngineResult<()> {
        if self.duration_seconds.is_nan() || self.duration_seconds <= 0.0 {
            return Err(EngineError::invalid_config(
                "calibration.duration_seconds",
                format!("must be positive, got {}", self.duration_seconds),
            ));
        }
        Ok(())
    }
}

/// Baseline measurements derived from the calibration window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Median elbow angle (mean of both arms) in degrees
    pub top_elbow_angle: f64,
    /// Median shoulder-midpoint height
    pub shoulder_y_top: f64,
    /// Median hip-midpoint height
    pub hip_y_top: f64,
    /// Median left shoulder-to-hip distance, floored above zero
    pub torso_length: f64,
}

#[derive(Debug, Default)]
struct Samples {
    elbow_angles: Vec<f64>,
    shoulder_ys: Vec<f64>,
    hip_ys: Vec<f64>,
    torso_lengths: Vec<f64>,
}

impl Samples {
    fn len(&self) -> usize {
        self.elbow_angles.len()
    }

    fn clear(&mut self) {
        self.elbow_angles.clear();
        self.shoulder_ys.clear();
        self.hip_ys.clear();
        self.torso_lengths.clear();
    }
}

/// Accumulates frames until the window elapses, then yields one result
#[derive(Debug)]
pub struct PassiveCalibrator {
    config: CalibrationConfig,
    clock: SharedClock,
    started_at: Option<f64>,
    samples: Samples,
    result: Option<CalibrationResult>,
}

impl PassiveCalibrator {
    /// Create a calibrator reading time from `clock`
    #[must_use]
    pub fn new(config: CalibrationConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            started_at: None,
            samples: Samples::default(),
            result: None,
        }
    }

    /// Feed one frame
    ///
    /// Returns the result on exactly one call: the first sampled frame at or
    /// after the end of the window. Every other call returns `None`.
    pub fn update(&mut self, pose: &PoseFrame) -> Option<CalibrationResult> {
        if !pose.is_valid() || self.result.is_some() {
            return None;
        }

        let now = self.clock.now_seconds();
        let started_at = *self.started_at.get_or_insert(now);

        let Some(
            [l_shoulder, r_shoulder, l_elbow, r_elbow, l_wrist, r_wrist, l_hip, r_hip],
        ) = pose.raw().group(REQUIRED_JOINTS)
        else {
            debug!(
                missing = ?pose.raw().missing(&REQUIRED_JOINTS),
                "Calibration frame skipped"
            );
            return None;
        };

        let left_angle = angle_degrees(l_shoulder, l_elbow, l_wrist);
        let right_angle = angle_degrees(r_shoulder, r_elbow, r_wrist);
        self.samples.elbow_angles.push((left_angle + right_angle) / 2.0);
        self.samples
            .shoulder_ys
            .push(midpoint(l_shoulder, r_shoulder).y);
        self.samples.hip_ys.push(midpoint(l_hip, r_hip).y);
        self.samples
            .torso_lengths
            .push(distance(l_shoulder, l_hip));

        if now - started_at < self.config.duration_seconds
            || self.samples.len() < self.config.min_samples.max(1)
        {
            return None;
        }

        let result = CalibrationResult {
            top_elbow_angle: median(&self.samples.elbow_angles)?,
            shoulder_y_top: median(&self.samples.shoulder_ys)?,
            hip_y_top: median(&self.samples.hip_ys)?,
            torso_length: median(&self.samples.torso_lengths)?.max(MIN_REFERENCE_LENGTH),
        };
        info!(
            samples = self.samples.len(),
            top_elbow_angle = result.top_elbow_angle,
            torso_length = result.torso_length,
            "Calibration complete"
        );
        self.result = Some(result);
        Some(result)
    }

    /// The stored result once calibration has completed
    #[must_use]
    pub const fn result(&self) -> Option<CalibrationResult> {
        self.result
    }

    /// Whether a result has been produced
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Samples gathered so far
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Restart calibration from scratch
    pub fn reset(&mut self) {
        self.started_at = None;
        self.samples.clear();
        self.result = None;
    }
}
