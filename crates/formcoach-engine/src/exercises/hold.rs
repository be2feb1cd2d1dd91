// ABOUTME: Isometric hold counter (plank, wall sit, glute bridge, hip hinge, split-squat hold)
// ABOUTME: READY -> HOLDING -> COUNTED driven by a joint-angle band and the injected clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Isometric Holds
//!
//! The hold predicate is a joint angle inside a band, measured on the first
//! fully visible side. The band is inclusive unless the lower edge is marked
//! exclusive, as it is for straight-body holds. Entering the band starts the
//! timer; leaving it before `hold_seconds` returns to READY without a count. Sustaining it
//! counts once and moves to COUNTED, and leaving the band from COUNTED arms
//! the next hold.

use formcoach_core::geometry::angle_degrees;
use formcoach_core::{LandmarkName, LandmarkSet, PoseFrame, SharedClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::warnings;
use super::{ExerciseCounter, ExerciseState, Phase};
use crate::errors::{EngineError, EngineResult};

/// Joint triple whose middle angle defines the hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldJoints {
    /// Angle at the hip between shoulder and knee (planks, bridges, hinges)
    ShoulderHipKnee,
    /// Angle at the knee between hip and ankle (wall sits, split squats)
    HipKneeAnkle,
}

impl HoldJoints {
    /// Alternative landmark groups, left side first
    #[must_use]
    pub const fn groups(self) -> [[LandmarkName; 3]; 2] {
        match self {
            Self::ShoulderHipKnee => [
                [
                    LandmarkName::LeftShoulder,
                    LandmarkName::LeftHip,
                    LandmarkName::LeftKnee,
                ],
                [
                    LandmarkName::RightShoulder,
                    LandmarkName::RightHip,
                    LandmarkName::RightKnee,
                ],
            ],
            Self::HipKneeAnkle => [
                [
                    LandmarkName::LeftHip,
                    LandmarkName::LeftKnee,
                    LandmarkName::LeftAnkle,
                ],
                [
                    LandmarkName::RightHip,
                    LandmarkName::RightKnee,
                    LandmarkName::RightAnkle,
                ],
            ],
        }
    }

    /// Angle on the first complete group, or `None` when no group is complete
    #[must_use]
    pub fn angle(self, landmarks: &LandmarkSet) -> Option<f64> {
        self.groups()
            .into_iter()
            .find_map(|group| landmarks.group(group))
            .map(|[a, b, c]| angle_degrees(a, b, c))
    }
}

/// Hold duration and angle band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldConfig {
    /// Seconds the predicate must be sustained
    pub hold_seconds: f64,
    /// Measured joints
    pub joints: HoldJoints,
    /// Lowest accepted angle
    pub min_angle: f64,
    /// Highest accepted angle, inclusive
    pub max_angle: f64,
    /// Reject an angle equal to `min_angle`
    #[serde(default)]
    pub exclusive_min: bool,
}

impl HoldConfig {
    /// Build a hold configuration
    #[must_use]
    pub const fn new(
        joints: HoldJoints,
        min_angle: f64,
        max_angle: f64,
        hold_seconds: f64,
    ) -> Self {
        Self {
            hold_seconds,
            joints,
            min_angle,
            max_angle,
            exclusive_min: false,
        }
    }

    /// Require the angle to be strictly above `min_angle`
    #[must_use]
    pub const fn with_exclusive_min(mut self) -> Self {
        self.exclusive_min = true;
        self
    }

    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` for a non-positive duration or an
    /// empty angle band.
    pub fn validate(&self) -> EngineResult<()> {
        if self.hold_seconds.is_nan() || self.hold_seconds <= 0.0 {
            return Err(EngineError::invalid_config(
                "hold.hold_seconds",
                format!("must be positive, got {}", self.hold_seconds),
            ));
        }
        let empty = if self.exclusive_min {
            self.min_angle >= self.max_angle
        } else {
            self.min_angle > self.max_angle
        };
        if self.min_angle.is_nan() || self.max_angle.is_nan() || empty {
            return Err(EngineError::invalid_config(
                "hold.angle_band",
                format!("empty band [{}, {}]", self.min_angle, self.max_angle),
            ));
        }
        Ok(())
    }

    /// Whether `angle` lies inside the band
    #[must_use]
    pub fn accepts(&self, angle: f64) -> bool {
        let above_min = if self.exclusive_min {
            angle > self.min_angle
        } else {
            angle >= self.min_angle
        };
        above_min && angle <= self.max_angle
    }
}

/// Timed isometric hold counter
#[derive(Debug)]
pub struct HoldCounter {
    name: &'static str,
    config: HoldConfig,
    clock: SharedClock,
    rep_count: u32,
    phase: Phase,
    hold_started: Option<f64>,
}

impl HoldCounter {
    /// Create a counter reporting `name`, timed by `clock`
    #[must_use]
    pub fn new(name: &'static str, config: HoldConfig, clock: SharedClock) -> Self {
        Self {
            name,
            config,
            clock,
            rep_count: 0,
            phase: Phase::Ready,
            hold_started: None,
        }
    }
}

impl ExerciseCounter for HoldCounter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(self.rep_count, self.phase, warnings::NO_POSE, true);
        }
        let Some(angle) = self.config.joints.angle(pose.raw()) else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::BODY_NOT_VISIBLE,
                true,
            );
        };

        let holding = self.config.accepts(angle);
        let now = self.clock.now_seconds();

        match self.phase {
            Phase::Ready if holding => {
                debug!(exercise = self.name, angle, "Hold started");
                self.phase = Phase::Holding;
                self.hold_started = Some(now);
            }
            Phase::Holding if !holding => {
                debug!(exercise = self.name, angle, "Hold broken early");
                self.phase = Phase::Ready;
                self.hold_started = None;
            }
            Phase::Holding => {
                if self
                    .hold_started
                    .is_some_and(|start| now - start >= self.config.hold_seconds)
                {
                    self.rep_count += 1;
                    self.phase = Phase::Counted;
                    info!(exercise = self.name, reps = self.rep_count, "Hold counted");
                }
            }
            Phase::Counted if !holding => {
                self.phase = Phase::Ready;
                self.hold_started = None;
            }
            _ => {}
        }

        let mut messages = Vec::new();
        if self.phase == Phase::Holding {
            let elapsed = self.hold_started.map_or(0.0, |start| now - start);
            let remaining = (self.config.hold_seconds - elapsed).max(0.0);
            messages.push(format!("Hold {remaining:.1}s"));
        }
        ExerciseState::new(self.rep_count, self.phase, messages, true)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Ready;
        self.hold_started = None;
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}
