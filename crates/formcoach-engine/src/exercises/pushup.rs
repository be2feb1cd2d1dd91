// ABOUTME: Calibrated push-up counter with hip-line stability tracking
// ABOUTME: Four-phase elbow/shoulder-drop machine with thresholds from the calibration baseline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Push-Up Counter
//!
//! Stays in CALIBRATING until a [`CalibrationResult`] is applied. Elbow
//! thresholds derive from the calibrated top angle; shoulder drop and hip
//! deviation are expressed in calibrated torso lengths.
//!
//! The ascent gate uses shoulder velocity in torso lengths per second,
//! measured over a lookback window of frame timestamps rather than between
//! consecutive frames, so the threshold does not depend on the frame rate.
//!
//! Hip deviation above tolerance for several consecutive frames emits a
//! warning. When that happens during the descent or at the bottom, the rep
//! in progress is marked invalid: it still completes its phase cycle but is
//! not counted.

use std::collections::VecDeque;

use formcoach_core::geometry::{angle_degrees, midpoint, velocity};
use formcoach_core::{LandmarkName, PoseFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::warnings;
use super::{ExerciseCounter, ExerciseState, Phase};
use crate::calibration::CalibrationResult;
use crate::errors::{EngineError, EngineResult};

const ARM_JOINTS: [LandmarkName; 6] = [
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
    LandmarkName::LeftElbow,
    LandmarkName::RightElbow,
    LandmarkName::LeftWrist,
    LandmarkName::RightWrist,
];

const HIP_JOINTS: [LandmarkName; 2] = [LandmarkName::LeftHip, LandmarkName::RightHip];

/// Push-up tuning relative to the calibration baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushUpConfig {
    /// Degrees below the top angle that define the bottom angle
    pub bottom_angle_offset: f64,
    /// Lowest allowed bottom angle, in degrees
    pub min_bottom_angle: f64,
    /// Shoulder drop in torso lengths required at the bottom
    pub min_shoulder_drop: f64,
    /// Shoulder drop in torso lengths that starts the descent
    pub start_drop: f64,
    /// Shoulder drop at or below which the subject is back at the top
    pub top_drop_tolerance: f64,
    /// Hip deviation in torso lengths counted as a bad frame
    pub hip_deviation_tolerance: f64,
    /// Consecutive bad frames that flag instability
    pub bad_hip_frames: u32,
    /// Shoulder velocity (torso lengths per second, negative is upward) that starts the ascent
    pub ascent_velocity: f64,
    /// Seconds of history used to measure shoulder velocity
    pub velocity_lookback_seconds: f64,
}

impl Default for PushUpConfig {
    fn default() -> Self {
        Self {
            bottom_angle_offset: 70.0,
            min_bottom_angle: 40.0,
            min_shoulder_drop: 0.25,
            start_drop: 0.05,
            top_drop_tolerance: 0.1,
            hip_deviation_tolerance: 0.25,
            bad_hip_frames: 5,
            ascent_velocity: -0.1,
            velocity_lookback_seconds: 0.1,
        }
    }
}

impl PushUpConfig {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` when the velocity gate could never
    /// fire or the stability window is empty.
    pub fn validate(&self) -> EngineResult<()> {
        if self.ascent_velocity.is_nan() || self.ascent_velocity >= 0.0 {
            return Err(EngineError::invalid_config(
                "pushup.ascent_velocity",
                format!("must be negative, got {}", self.ascent_velocity),
            ));
        }
        if self.bad_hip_frames == 0 {
            return Err(EngineError::invalid_config(
                "pushup.bad_hip_frames",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Thresholds {
    top_elbow_angle: f64,
    bottom_elbow_angle: f64,
    shoulder_y_top: f64,
    hip_y_top: f64,
    torso_length: f64,
}

/// Upper bound on retained shoulder samples
const MAX_SHOULDER_SAMPLES: usize = 64;

/// Calibration-dependent push-up counter
#[derive(Debug)]
pub struct PushUpCounter {
    config: PushUpConfig,
    rep_count: u32,
    phase: Phase,
    rep_valid: bool,
    thresholds: Option<Thresholds>,
    shoulder_samples: VecDeque<(f64, f64)>,
    bad_hip_frames: u32,
}

impl PushUpCounter {
    /// Create a counter waiting for calibration
    #[must_use]
    pub const fn new(config: PushUpConfig) -> Self {
        Self {
            config,
            rep_count: 0,
            phase: Phase::Calibrating,
            rep_valid: true,
            thresholds: None,
            shoulder_samples: VecDeque::new(),
            bad_hip_frames: 0,
        }
    }

    /// Shoulder velocity in torso lengths per second, if measurable
    ///
    /// Compares against the newest stored sample at least one lookback window
    /// older than `timestamp`, or the oldest sample when none is that old.
    fn shoulder_velocity(&self, timestamp: f64, shoulder_y: f64, torso_length: f64) -> Option<f64> {
        let cutoff = timestamp - self.config.velocity_lookback_seconds;
        let &(prev_t, prev_y) = self
            .shoulder_samples
            .iter()
            .rev()
            .find(|(t, _)| *t <= cutoff)
            .or_else(|| self.shoulder_samples.front())?;
        velocity(prev_y, prev_t, shoulder_y, timestamp).map(|v| v / torso_length)
    }

    fn record_shoulder(&mut self, timestamp: f64, shoulder_y: f64) {
        let horizon = timestamp - self.config.velocity_lookback_seconds * 4.0;
        while self.shoulder_samples.len() >= MAX_SHOULDER_SAMPLES
            || self
                .shoulder_samples
                .front()
                .is_some_and(|(t, _)| *t < horizon)
        {
            self.shoulder_samples.pop_front();
        }
        self.shoulder_samples.push_back((timestamp, shoulder_y));
    }

    fn transition(&mut self, next: Phase, elbow_angle: f64, shoulder_drop: f64) {
        debug!(
            from = %self.phase,
            to = %next,
            elbow_angle,
            shoulder_drop,
            "Push-up phase transition"
        );
        self.phase = next;
    }
}

impl ExerciseCounter for PushUpCounter {
    fn name(&self) -> &'static str {
        "pushup"
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::NO_POSE,
                self.rep_valid,
            );
        }
        let Some(th) = self.thresholds else {
            return ExerciseState::signal(
                self.rep_count,
                Phase::Calibrating,
                warnings::CALIBRATING,
                self.rep_valid,
            );
        };
        let Some(
            [left_shoulder, right_shoulder, left_elbow, right_elbow, left_wrist, right_wrist],
        ) = pose.raw().group(ARM_JOINTS)
        else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::ARMS_SHOULDERS_NOT_VISIBLE,
                self.rep_valid,
            );
        };

        let elbow_angle = (angle_degrees(left_shoulder, left_elbow, left_wrist)
            + angle_degrees(right_shoulder, right_elbow, right_wrist))
            / 2.0;
        let shoulder_y = midpoint(left_shoulder, right_shoulder).y;
        let shoulder_drop = (shoulder_y - th.shoulder_y_top) / th.torso_length;

        let timestamp = pose.timestamp();
        let shoulder_velocity = self.shoulder_velocity(timestamp, shoulder_y, th.torso_length);
        self.record_shoulder(timestamp, shoulder_y);

        let mut messages = Vec::new();
        if let Some([left_hip, right_hip]) = pose.raw().group(HIP_JOINTS) {
            let hip_y = midpoint(left_hip, right_hip).y;
            let deviation = (hip_y - th.hip_y_top).abs() / th.torso_length;
            if deviation > self.config.hip_deviation_tolerance {
                self.bad_hip_frames += 1;
            } else {
                self.bad_hip_frames = 0;
            }
            if self.bad_hip_frames >= self.config.bad_hip_frames {
                messages.push(warnings::KEEP_HIPS_STABLE.to_owned());
                if matches!(self.phase, Phase::Down | Phase::Bottom) {
                    self.rep_valid = false;
                }
            }
        } else {
            messages.push(warnings::HIPS_NOT_VISIBLE.to_owned());
        }

        match self.phase {
            Phase::Top => {
                if elbow_angle < th.top_elbow_angle - 10.0 && shoulder_drop > self.config.start_drop
                {
                    self.transition(Phase::Down, elbow_angle, shoulder_drop);
                    self.rep_valid = true;
                    self.bad_hip_frames = 0;
                }
            }
            Phase::Down => {
                if elbow_angle <= th.bottom_elbow_angle
                    && shoulder_drop >= self.config.min_shoulder_drop
                {
                    self.transition(Phase::Bottom, elbow_angle, shoulder_drop);
                }
            }
            Phase::Bottom => {
                let rising = shoulder_velocity.is_some_and(|v| v < self.config.ascent_velocity);
                if rising && elbow_angle > th.bottom_elbow_angle + 5.0 {
                    self.transition(Phase::Up, elbow_angle, shoulder_drop);
                }
            }
            Phase::Up => {
                if elbow_angle >= th.top_elbow_angle - 5.0
                    && shoulder_drop <= self.config.top_drop_tolerance
                {
                    if self.rep_valid {
                        self.rep_count += 1;
                        info!(reps = self.rep_count, "Push-up rep counted");
                    } else {
                        info!("Push-up rep rejected for hip instability");
                        messages.push(warnings::REP_NOT_COUNTED.to_owned());
                    }
                    self.transition(Phase::Top, elbow_angle, shoulder_drop);
                }
            }
            _ => {}
        }

        if matches!(self.phase, Phase::Down | Phase::Bottom)
            && elbow_angle > th.bottom_elbow_angle + 10.0
        {
            messages.push(warnings::GO_LOWER.to_owned());
        }

        ExerciseState::new(self.rep_count, self.phase, messages, self.rep_valid)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Calibrating;
        self.rep_valid = true;
        self.thresholds = None;
        self.shoulder_samples.clear();
        self.bad_hip_frames = 0;
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn requires_calibration(&self) -> bool {
        true
    }

    fn apply_calibration(&mut self, calibration: &CalibrationResult) {
        let top = calibration.top_elbow_angle;
        let thresholds = Thresholds {
            top_elbow_angle: top,
            bottom_elbow_angle: (top - self.config.bottom_angle_offset)
                .max(self.config.min_bottom_angle),
            shoulder_y_top: calibration.shoulder_y_top,
            hip_y_top: calibration.hip_y_top,
            torso_length: calibration.torso_length,
        };
        info!(
            top_elbow_angle = thresholds.top_elbow_angle,
            bottom_elbow_angle = thresholds.bottom_elbow_angle,
            "Push-up thresholds set from calibration"
        );
        self.thresholds = Some(thresholds);
        self.phase = Phase::Top;
        self.rep_valid = true;
        self.bad_hip_frames = 0;
        self.shoulder_samples.clear();
    }
}
