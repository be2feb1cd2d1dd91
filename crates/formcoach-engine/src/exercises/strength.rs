// ABOUTME: Four-phase knee-angle counters for squats and lunges
// ABOUTME: TOP -> DOWN -> BOTTOM -> UP -> TOP gated on knee angle and hip drop together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Strength Movements
//!
//! Both conditions (knee angle and leg-length-normalized hip drop) must hold
//! to advance, so a knee bend without a matching hip descent never reaches
//! BOTTOM. The hip reference height and leg length come from the first frame
//! in which the legs are visible.

use formcoach_core::geometry::{angle_degrees, distance, floor_reference};
use formcoach_core::{Landmark, LandmarkName, LandmarkSet, PoseFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::{select_side, warnings};
use super::{ExerciseCounter, ExerciseState, Phase};

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

/// Hip drop at or below which the subject is back at the top
const TOP_DROP_TOLERANCE: f64 = 0.05;
/// Degrees above the bottom angle that mark the start of the ascent
const ASCENT_MARGIN: f64 = 5.0;
/// Degrees below the top angle still accepted as fully extended
const LOCKOUT_MARGIN: f64 = 5.0;
/// Degrees above the bottom angle that trigger the depth warning
const DEPTH_WARNING_MARGIN: f64 = 10.0;

/// Which legs feed the measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSelection {
    /// Average both legs when both are visible, else use the visible one
    BothLegs,
    /// Use a single leg, left first
    SingleLeg,
}

/// Four-phase thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthConfig {
    /// Knee angle of a standing leg, in degrees
    pub top_knee_angle: f64,
    /// Knee angle that must be reached at the bottom, in degrees
    pub bottom_knee_angle: f64,
    /// Hip drop in leg lengths required at the bottom
    pub hip_drop_min: f64,
    /// Hip drop in leg lengths that starts the descent
    pub start_drop: f64,
    /// Leg measurement strategy
    pub legs: LegSelection,
}

impl StrengthConfig {
    /// Squat defaults
    #[must_use]
    pub const fn squat() -> Self {
        Self {
            top_knee_angle: 165.0,
            bottom_knee_angle: 100.0,
            hip_drop_min: 0.18,
            start_drop: 0.08,
            legs: LegSelection::BothLegs,
        }
    }

    /// Lunge defaults
    #[must_use]
    pub const fn lunge() -> Self {
        Self {
            top_knee_angle: 165.0,
            bottom_knee_angle: 95.0,
            hip_drop_min: 0.16,
            start_drop: 0.08,
            legs: LegSelection::SingleLeg,
        }
    }

    /// Same configuration with a different bottom angle and minimum drop
    #[must_use]
    pub const fn with_depth(mut self, bottom_knee_angle: f64, hip_drop_min: f64) -> Self {
        self.bottom_knee_angle = bottom_knee_angle;
        self.hip_drop_min = hip_drop_min;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct LegMeasurement {
    knee_angle: f64,
    hip_y: f64,
    leg_length: f64,
}

impl LegMeasurement {
    fn from_leg([hip, knee, ankle]: [Landmark; 3]) -> Self {
        Self {
            knee_angle: angle_degrees(hip, knee, ankle),
            hip_y: hip.y,
            leg_length: distance(hip, ankle),
        }
    }

    fn average(a: Self, b: Self) -> Self {
        Self {
            knee_angle: (a.knee_angle + b.knee_angle) / 2.0,
            hip_y: (a.hip_y + b.hip_y) / 2.0,
            leg_length: (a.leg_length + b.leg_length) / 2.0,
        }
    }
}

fn measure(landmarks: &LandmarkSet, legs: LegSelection) -> Option<LegMeasurement> {
    if legs == LegSelection::BothLegs {
        if let (Some(left), Some(right)) = (landmarks.group(LEFT_LEG), landmarks.group(RIGHT_LEG))
        {
            return Some(LegMeasurement::average(
                LegMeasurement::from_leg(left),
                LegMeasurement::from_leg(right),
            ));
        }
    }
    select_side(landmarks, LEFT_LEG, RIGHT_LEG).map(|(_, leg)| LegMeasurement::from_leg(leg))
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    hip_y_top: f64,
    leg_length: f64,
}

/// Squat or lunge counter
#[derive(Debug)]
pub struct StrengthCounter {
    name: &'static str,
    config: StrengthConfig,
    rep_count: u32,
    phase: Phase,
    baseline: Option<Baseline>,
}

impl StrengthCounter {
    /// Create a counter reporting `name`
    #[must_use]
    pub const fn new(name: &'static str, config: StrengthConfig) -> Self {
        Self {
            name,
            config,
            rep_count: 0,
            phase: Phase::Top,
            baseline: None,
        }
    }

    /// Squat counter with the given thresholds
    #[must_use]
    pub const fn squat(config: StrengthConfig) -> Self {
        Self::new("squat", config)
    }

    /// Lunge counter with the given thresholds
    #[must_use]
    pub const fn lunge(config: StrengthConfig) -> Self {
        Self::new("lunge", config)
    }

    /// Apply one frame's measurements to the phase machine
    fn advance(&mut self, knee_angle: f64, hip_drop: f64) {
        let cfg = &self.config;
        let next = match self.phase {
            Phase::Top if knee_angle < cfg.top_knee_angle && hip_drop > cfg.start_drop => {
                Some(Phase::Down)
            }
            Phase::Down
                if knee_angle <= cfg.bottom_knee_angle && hip_drop >= cfg.hip_drop_min =>
            {
                Some(Phase::Bottom)
            }
            Phase::Bottom if knee_angle > cfg.bottom_knee_angle + ASCENT_MARGIN => Some(Phase::Up),
            Phase::Up
                if knee_angle >= cfg.top_knee_angle - LOCKOUT_MARGIN
                    && hip_drop <= TOP_DROP_TOLERANCE =>
            {
                Some(Phase::Top)
            }
            _ => None,
        };

        let Some(next) = next else {
            return;
        };
        debug!(
            exercise = self.name,
            from = %self.phase,
            to = %next,
            knee_angle,
            hip_drop,
            "Phase transition"
        );
        if self.phase == Phase::Up && next == Phase::Top {
            self.rep_count += 1;
            info!(exercise = self.name, reps = self.rep_count, "Rep counted");
        }
        self.phase = next;
    }
}

impl ExerciseCounter for StrengthCounter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(self.rep_count, self.phase, warnings::NO_POSE, true);
        }
        let Some(leg) = measure(pose.raw(), self.config.legs) else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::LEGS_NOT_VISIBLE,
                true,
            );
        };

        let baseline = *self.baseline.get_or_insert_with(|| Baseline {
            hip_y_top: leg.hip_y,
            leg_length: floor_reference(leg.leg_length),
        });
        let hip_drop = (leg.hip_y - baseline.hip_y_top) / baseline.leg_length;

        self.advance(leg.knee_angle, hip_drop);

        let mut messages = Vec::new();
        if matches!(self.phase, Phase::Down | Phase::Bottom)
            && leg.knee_angle > self.config.bottom_knee_angle + DEPTH_WARNING_MARGIN
        {
            messages.push(warnings::GO_LOWER.to_owned());
        }
        ExerciseState::new(self.rep_count, self.phase, messages, true)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Top;
        self.baseline = None;
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}
