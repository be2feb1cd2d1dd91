// ABOUTME: Two-phase displacement counters for arm raises, knee raises, torso bends, and sit-ups
// ABOUTME: Enter on a raise threshold, count on the return past a looser exit threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Each counter measures one displacement relative to a body-scale reference
//! captured on the first usable frame (shoulder width, leg length, or torso
//! length). The entry threshold is always stricter than the exit threshold.

use formcoach_core::geometry::{angle_degrees, distance, floor_reference};
use formcoach_core::{LandmarkName, PoseFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::{select_side, warnings};
use super::{ExerciseCounter, ExerciseState, Phase};

/// Two-phase cycle shared by the counters in this module
#[derive(Debug, Clone, Copy)]
struct TwoPhase {
    exercise: &'static str,
    rest: Phase,
    active: Phase,
    phase: Phase,
    rep_count: u32,
}

impl TwoPhase {
    const fn new(exercise: &'static str, rest: Phase, active: Phase) -> Self {
        Self {
            exercise,
            rest,
            active,
            phase: rest,
            rep_count: 0,
        }
    }

    /// Advance one frame, counting on the return to the rest phase
    fn step(&mut self, enter: bool, exit: bool) {
        if self.phase == self.rest && enter {
            debug!(
                exercise = self.exercise,
                from = %self.rest,
                to = %self.active,
                "Phase transition"
            );
            self.phase = self.active;
        } else if self.phase == self.active && exit {
            self.phase = self.rest;
            self.rep_count += 1;
            info!(exercise = self.exercise, reps = self.rep_count, "Rep counted");
        }
    }

    fn is_active(&self) -> bool {
        self.phase == self.active
    }

    fn signal(&self, warning: &str) -> ExerciseState {
        ExerciseState::signal(self.rep_count, self.phase, warning, true)
    }

    fn state(&self, warnings: Vec<String>) -> ExerciseState {
        ExerciseState::new(self.rep_count, self.phase, warnings, true)
    }

    fn reset(&mut self) {
        self.phase = self.rest;
        self.rep_count = 0;
    }
}

const ARM_JOINTS: [LandmarkName; 4] = [
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
    LandmarkName::LeftWrist,
    LandmarkName::RightWrist,
];

const TORSO_JOINTS: [LandmarkName; 4] = [
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
    LandmarkName::LeftHip,
    LandmarkName::RightHip,
];

const LEFT_LEG: [LandmarkName; 3] = [
    LandmarkName::LeftHip,
    LandmarkName::LeftKnee,
    LandmarkName::LeftAnkle,
];

const RIGHT_LEG: [LandmarkName; 3] = [
    LandmarkName::RightHip,
    LandmarkName::RightKnee,
    LandmarkName::RightAnkle,
];

const LEFT_TRUNK: [LandmarkName; 3] = [
    LandmarkName::LeftShoulder,
    LandmarkName::LeftHip,
    LandmarkName::LeftKnee,
];

const RIGHT_TRUNK: [LandmarkName; 3] = [
    LandmarkName::RightShoulder,
    LandmarkName::RightHip,
    LandmarkName::RightKnee,
];

/// Arm-raise thresholds in shoulder widths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmRaiseConfig {
    /// Wrists above shoulders needed to enter UP
    pub raise_delta: f64,
    /// Wrists below shoulders needed to return to DOWN
    pub lower_delta: f64,
}

impl Default for ArmRaiseConfig {
    fn default() -> Self {
        Self {
            raise_delta: 0.45,
            lower_delta: 0.15,
        }
    }
}

/// Both arms raised above the shoulder line and lowered back down
#[derive(Debug)]
pub struct ArmRaiseCounter {
    config: ArmRaiseConfig,
    cycle: TwoPhase,
    shoulder_width: Option<f64>,
}

impl ArmRaiseCounter {
    /// Create a counter
    #[must_use]
    pub const fn new(config: ArmRaiseConfig) -> Self {
        Self {
            config,
            cycle: TwoPhase::new("arm_raise", Phase::Down, Phase::Up),
            shoulder_width: None,
        }
    }
}

impl ExerciseCounter for ArmRaiseCounter {
    fn name(&self) -> &'static str {
        self.cycle.exercise
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return self.cycle.signal(warnings::NO_POSE);
        }
        let Some([left_shoulder, right_shoulder, left_wrist, right_wrist]) =
            pose.raw().group(ARM_JOINTS)
        else {
            return self.cycle.signal(warnings::ARMS_NOT_VISIBLE);
        };

        let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
        let wrist_y = (left_wrist.y + right_wrist.y) / 2.0;
        let width = *self
            .shoulder_width
            .get_or_insert_with(|| floor_reference(distance(left_shoulder, right_shoulder)));

        let raise = (shoulder_y - wrist_y) / width;
        self.cycle.step(
            raise >= self.config.raise_delta,
            -raise >= self.config.lower_delta,
        );

        let mut messages = Vec::new();
        if self.cycle.is_active() && raise < self.config.raise_delta * 0.8 {
            messages.push(warnings::RAISE_ARMS_HIGHER.to_owned());
        }
        self.cycle.state(messages)
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.shoulder_width = None;
    }

    fn rep_count(&self) -> u32 {
        self.cycle.rep_count
    }

    fn phase(&self) -> Phase {
        self.cycle.phase
    }
}

/// Knee-raise thresholds in leg lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KneeRaiseConfig {
    /// Knee above hip level needed to enter UP (hip minus knee height)
    pub raise_delta: f64,
    /// Raise at or below which the knee counts as lowered
    pub lower_delta: f64,
}

impl Default for KneeRaiseConfig {
    fn default() -> Self {
        Self {
            raise_delta: 0.35,
            lower_delta: 0.12,
        }
    }
}

/// One knee driven up toward the hip and back down
#[derive(Debug)]
pub struct KneeRaiseCounter {
    config: KneeRaiseConfig,
    cycle: TwoPhase,
    leg_length: Option<f64>,
}

impl KneeRaiseCounter {
    /// Create a counter
    #[must_use]
    pub const fn new(config: KneeRaiseConfig) -> Self {
        Self {
            config,
            cycle: TwoPhase::new("knee_raise", Phase::Down, Phase::Up),
            leg_length: None,
        }
    }
}

impl ExerciseCounter for KneeRaiseCounter {
    fn name(&self) -> &'static str {
        self.cycle.exercise
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return self.cycle.signal(warnings::NO_POSE);
        }
        let Some((_, [hip, knee, ankle])) = select_side(pose.raw(), LEFT_LEG, RIGHT_LEG) else {
            return self.cycle.signal(warnings::LEGS_NOT_VISIBLE);
        };

        let leg_length = *self
            .leg_length
            .get_or_insert_with(|| floor_reference(distance(hip, ankle)));
        let raise = (hip.y - knee.y) / leg_length;

        self.cycle.step(
            raise >= self.config.raise_delta,
            raise <= self.config.lower_delta,
        );

        let mut messages = Vec::new();
        if self.cycle.is_active() && raise < self.config.raise_delta * 0.85 {
            messages.push(warnings::LIFT_KNEE_HIGHER.to_owned());
        }
        self.cycle.state(messages)
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.leg_length = None;
    }

    fn rep_count(&self) -> u32 {
        self.cycle.rep_count
    }

    fn phase(&self) -> Phase {
        self.cycle.phase
    }
}

/// Side-bend thresholds in shoulder widths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorsoBendConfig {
    /// Horizontal shoulder-over-hip offset needed to enter BEND
    pub bend_delta: f64,
    /// Offset at or below which the torso counts as centered
    pub return_delta: f64,
}

impl Default for TorsoBendConfig {
    fn default() -> Self {
        Self {
            bend_delta: 0.25,
            return_delta: 0.08,
        }
    }
}

/// Lateral torso bends to either side
#[derive(Debug)]
pub struct TorsoBendCounter {
    config: TorsoBendConfig,
    cycle: TwoPhase,
    shoulder_width: Option<f64>,
}

impl TorsoBendCounter {
    /// Create a counter
    #[must_use]
    pub const fn new(config: TorsoBendConfig) -> Self {
        Self {
            config,
            cycle: TwoPhase::new("torso_bend", Phase::Center, Phase::Bend),
            shoulder_width: None,
        }
    }
}

impl ExerciseCounter for TorsoBendCounter {
    fn name(&self) -> &'static str {
        self.cycle.exercise
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return self.cycle.signal(warnings::NO_POSE);
        }
        let Some([left_shoulder, right_shoulder, left_hip, right_hip]) =
            pose.raw().group(TORSO_JOINTS)
        else {
            return self.cycle.signal(warnings::TORSO_NOT_VISIBLE);
        };

        let shoulder_x = (left_shoulder.x + right_shoulder.x) / 2.0;
        let hip_x = (left_hip.x + right_hip.x) / 2.0;
        let width = *self
            .shoulder_width
            .get_or_insert_with(|| floor_reference(distance(left_shoulder, right_shoulder)));
        let bend = (shoulder_x - hip_x).abs() / width;

        self.cycle.step(
            bend >= self.config.bend_delta,
            bend <= self.config.return_delta,
        );

        let mut messages = Vec::new();
        if self.cycle.is_active() && bend < self.config.bend_delta * 0.85 {
            messages.push(warnings::BEND_FURTHER.to_owned());
        }
        self.cycle.state(messages)
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.shoulder_width = None;
    }

    fn rep_count(&self) -> u32 {
        self.cycle.rep_count
    }

    fn phase(&self) -> Phase {
        self.cycle.phase
    }
}

/// Sit-up thresholds, viewed from the side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitUpConfig {
    /// Knee-hip-shoulder angle at or below which the torso is flat
    pub down_torso_angle: f64,
    /// Knee-hip-shoulder angle needed to enter UP
    pub up_torso_angle: f64,
    /// Hip rise in torso lengths needed to enter UP
    pub min_torso_raise: f64,
    /// Hip rise at or below which the subject is back down
    pub down_raise_tolerance: f64,
}

impl Default for SitUpConfig {
    fn default() -> Self {
        Self {
            down_torso_angle: 35.0,
            up_torso_angle: 70.0,
            min_torso_raise: 0.18,
            down_raise_tolerance: 0.05,
        }
    }
}

/// Sit-ups gated on torso angle and torso rise together
#[derive(Debug)]
pub struct SitUpCounter {
    config: SitUpConfig,
    cycle: TwoPhase,
    hip_y_base: Option<f64>,
    torso_length: Option<f64>,
}

impl SitUpCounter {
    /// Create a counter
    #[must_use]
    pub const fn new(config: SitUpConfig) -> Self {
        Self {
            config,
            cycle: TwoPhase::new("situp", Phase::Down, Phase::Up),
            hip_y_base: None,
            torso_length: None,
        }
    }
}

impl ExerciseCounter for SitUpCounter {
    fn name(&self) -> &'static str {
        self.cycle.exercise
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return self.cycle.signal(warnings::NO_POSE);
        }
        let Some((_, [shoulder, hip, knee])) = select_side(pose.raw(), LEFT_TRUNK, RIGHT_TRUNK)
        else {
            return self.cycle.signal(warnings::TORSO_NOT_VISIBLE);
        };

        let hip_y_base = *self.hip_y_base.get_or_insert(hip.y);
        let torso_length = *self
            .torso_length
            .get_or_insert_with(|| floor_reference(distance(shoulder, hip)));

        let torso_raise = (hip_y_base - hip.y) / torso_length;
        let torso_angle = angle_degrees(knee, hip, shoulder);

        self.cycle.step(
            torso_angle >= self.config.up_torso_angle
                && torso_raise >= self.config.min_torso_raise,
            torso_angle <= self.config.down_torso_angle
                && torso_raise <= self.config.down_raise_tolerance,
        );

        let mut messages = Vec::new();
        if self.cycle.is_active() {
            if torso_angle < self.config.up_torso_angle - 5.0 {
                messages.push(warnings::COME_UP_HIGHER.to_owned());
            }
        } else if torso_angle > self.config.down_torso_angle + 10.0 {
            messages.push(warnings::LIE_BACK_FURTHER.to_owned());
        }
        self.cycle.state(messages)
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.hip_y_base = None;
        self.torso_length = None;
    }

    fn rep_count(&self) -> u32 {
        self.cycle.rep_count
    }

    fn phase(&self) -> Phase {
        self.cycle.phase
    }
}
