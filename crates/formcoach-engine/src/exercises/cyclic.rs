// ABOUTME: Open/close cyclic counters for jumping-jack and leg-spread movements
// ABOUTME: Reps count on the debounced return to CLOSED after a committed OPEN
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formcoach_core::constants::pose::MIN_NORMALIZATION_SCALE;
use formcoach_core::geometry::{distance, floor_reference};
use formcoach_core::{LandmarkName, PoseFrame, SharedClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::{warnings, Debounce};
use super::{ExerciseCounter, ExerciseState, Phase};
use crate::stats::median;

const JUMPING_JACK_JOINTS: [LandmarkName; 8] = [
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
    LandmarkName::LeftWrist,
    LandmarkName::RightWrist,
    LandmarkName::LeftHip,
    LandmarkName::RightHip,
    LandmarkName::LeftAnkle,
    LandmarkName::RightAnkle,
];

const LEG_SPREAD_JOINTS: [LandmarkName; 4] = [
    LandmarkName::LeftHip,
    LandmarkName::RightHip,
    LandmarkName::LeftAnkle,
    LandmarkName::RightAnkle,
];

/// Hip width used when the calibrated median is degenerate
const FALLBACK_HIP_WIDTH: f64 = 0.2;

/// Jumping-jack tuning; deltas are multiples of the calibrated hip width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpingJackConfig {
    /// Self-calibration window in seconds
    pub calibration_seconds: f64,
    /// Wrists above shoulders needed for "arms up"
    pub arm_raise_factor: f64,
    /// Ankle spread beyond baseline needed for "legs apart"
    pub leg_spread_factor: f64,
    /// Wrists below shoulders needed for "arms down"
    pub arms_down_factor: f64,
    /// Ankle spread beyond baseline still counted as "legs together"
    pub legs_together_factor: f64,
    /// Consecutive frames needed to commit a transition
    pub debounce_frames: u32,
}

impl Default for JumpingJackConfig {
    fn default() -> Self {
        Self {
            calibration_seconds: 2.0,
            arm_raise_factor: 0.6,
            leg_spread_factor: 0.7,
            arms_down_factor: 0.15,
            legs_together_factor: 0.2,
            debounce_frames: 2,
        }
    }
}

impl JumpingJackConfig {
    /// Default tuning with custom arm and leg factors
    #[must_use]
    pub fn with_factors(arm_raise_factor: f64, leg_spread_factor: f64) -> Self {
        Self {
            arm_raise_factor,
            leg_spread_factor,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct JackBaseline {
    hip_width: f64,
    ankle_distance: f64,
}

#[derive(Debug, Default)]
struct JackSamples {
    started_at: Option<f64>,
    hip_widths: Vec<f64>,
    ankle_distances: Vec<f64>,
}

/// Jumping jacks with a short self-calibration window
#[derive(Debug)]
pub struct JumpingJackCounter {
    config: JumpingJackConfig,
    clock: SharedClock,
    rep_count: u32,
    phase: Phase,
    baseline: Option<JackBaseline>,
    samples: JackSamples,
    open: Debounce,
    close: Debounce,
}

impl JumpingJackCounter {
    /// Create a counter reading calibration time from `clock`
    #[must_use]
    pub fn new(config: JumpingJackConfig, clock: SharedClock) -> Self {
        let open = Debounce::new(config.debounce_frames);
        let close = Debounce::new(config.debounce_frames);
        Self {
            config,
            clock,
            rep_count: 0,
            phase: Phase::Calibrating,
            baseline: None,
            samples: JackSamples::default(),
            open,
            close,
        }
    }

    fn calibrate(&mut self, hip_width: f64, ankle_distance: f64) -> Option<JackBaseline> {
        self.samples.hip_widths.push(hip_width);
        self.samples.ankle_distances.push(ankle_distance);

        let now = self.clock.now_seconds();
        let started_at = *self.samples.started_at.get_or_insert(now);
        if now - started_at < self.config.calibration_seconds {
            return None;
        }

        let median_hip = median(&self.samples.hip_widths).unwrap_or(0.0);
        let hip_width = if median_hip < MIN_NORMALIZATION_SCALE {
            FALLBACK_HIP_WIDTH
        } else {
            median_hip
        };
        let baseline = JackBaseline {
            hip_width,
            ankle_distance: median(&self.samples.ankle_distances).unwrap_or(0.0),
        };
        info!(
            hip_width = baseline.hip_width,
            ankle_distance = baseline.ankle_distance,
            "Jumping jack calibration complete"
        );
        Some(baseline)
    }
}

impl ExerciseCounter for JumpingJackCounter {
    fn name(&self) -> &'static str {
        "jumping_jack"
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(self.rep_count, self.phase, warnings::NO_POSE, true);
        }
        let Some(
            [
                left_shoulder,
                right_shoulder,
                left_wrist,
                right_wrist,
                left_hip,
                right_hip,
                left_ankle,
                right_ankle,
            ],
        ) = pose.raw().group(JUMPING_JACK_JOINTS)
        else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::BODY_NOT_FULLY_VISIBLE,
                true,
            );
        };

        let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
        let wrist_y = (left_wrist.y + right_wrist.y) / 2.0;
        let ankle_distance = distance(left_ankle, right_ankle);

        let baseline = if let Some(baseline) = self.baseline {
            baseline
        } else {
            let Some(baseline) = self.calibrate(distance(left_hip, right_hip), ankle_distance)
            else {
                return ExerciseState::signal(
                    self.rep_count,
                    Phase::Calibrating,
                    warnings::CALIBRATING,
                    true,
                );
            };
            self.baseline = Some(baseline);
            self.phase = Phase::Closed;
            baseline
        };

        let arms_up = shoulder_y - wrist_y >= self.config.arm_raise_factor * baseline.hip_width;
        let arms_down = wrist_y - shoulder_y >= self.config.arms_down_factor * baseline.hip_width;
        let legs_apart = ankle_distance
            >= self
                .config
                .leg_spread_factor
                .mul_add(baseline.hip_width, baseline.ankle_distance);
        let legs_together = ankle_distance
            <= self
                .config
                .legs_together_factor
                .mul_add(baseline.hip_width, baseline.ankle_distance);

        match self.phase {
            Phase::Closed => {
                if self.open.observe(arms_up && legs_apart) {
                    debug!("Jumping jack CLOSED -> OPEN");
                    self.phase = Phase::Open;
                }
            }
            Phase::Open => {
                if self.close.observe(arms_down && legs_together) {
                    self.rep_count += 1;
                    self.phase = Phase::Closed;
                    info!(reps = self.rep_count, "Jumping jack rep counted");
                }
            }
            _ => {}
        }

        let mut messages = Vec::new();
        if self.phase == Phase::Open {
            if !arms_up {
                messages.push(warnings::RAISE_ARMS_HIGHER.to_owned());
            }
            if !legs_apart {
                messages.push(warnings::SPREAD_LEGS_WIDER.to_owned());
            }
        }
        ExerciseState::new(self.rep_count, self.phase, messages, true)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Calibrating;
        self.baseline = None;
        self.samples = JackSamples::default();
        self.open.clear();
        self.close.clear();
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}

/// Leg-spread tuning; deltas are multiples of the first-frame hip width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSpreadConfig {
    /// Spread beyond baseline needed to open
    pub spread_delta: f64,
    /// Spread beyond baseline at or below which the legs count as closed
    pub close_delta: f64,
    /// Consecutive frames needed to commit a transition
    pub debounce_frames: u32,
}

impl Default for LegSpreadConfig {
    fn default() -> Self {
        Self {
            spread_delta: 0.6,
            close_delta: 0.2,
            debounce_frames: 2,
        }
    }
}

impl LegSpreadConfig {
    /// Default tuning with custom deltas
    #[must_use]
    pub fn with_deltas(spread_delta: f64, close_delta: f64) -> Self {
        Self {
            spread_delta,
            close_delta,
            ..Self::default()
        }
    }
}

/// Leg spreads measured against the stance of the first visible frame
#[derive(Debug)]
pub struct LegSpreadCounter {
    config: LegSpreadConfig,
    rep_count: u32,
    phase: Phase,
    hip_width: Option<f64>,
    baseline_ankle_distance: Option<f64>,
    open: Debounce,
    close: Debounce,
}

impl LegSpreadCounter {
    /// Create a counter
    #[must_use]
    pub const fn new(config: LegSpreadConfig) -> Self {
        let open = Debounce::new(config.debounce_frames);
        let close = Debounce::new(config.debounce_frames);
        Self {
            config,
            rep_count: 0,
            phase: Phase::Closed,
            hip_width: None,
            baseline_ankle_distance: None,
            open,
            close,
        }
    }
}

impl ExerciseCounter for LegSpreadCounter {
    fn name(&self) -> &'static str {
        "leg_spread"
    }

    fn update(&mut self, pose: &PoseFrame, _bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(self.rep_count, self.phase, warnings::NO_POSE, true);
        }
        let Some([left_hip, right_hip, left_ankle, right_ankle]) =
            pose.raw().group(LEG_SPREAD_JOINTS)
        else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::LEGS_NOT_VISIBLE,
                true,
            );
        };

        let ankle_distance = distance(left_ankle, right_ankle);
        let hip_width = *self
            .hip_width
            .get_or_insert_with(|| floor_reference(distance(left_hip, right_hip)));
        let baseline = *self.baseline_ankle_distance.get_or_insert(ankle_distance);
        let spread = (ankle_distance - baseline) / hip_width;

        match self.phase {
            Phase::Closed => {
                if self.open.observe(spread >= self.config.spread_delta) {
                    debug!(spread, "Leg spread CLOSED -> OPEN");
                    self.phase = Phase::Open;
                }
            }
            Phase::Open => {
                if self.close.observe(spread <= self.config.close_delta) {
                    self.rep_count += 1;
                    self.phase = Phase::Closed;
                    info!(reps = self.rep_count, "Leg spread rep counted");
                }
            }
            _ => {}
        }

        let mut messages = Vec::new();
        if self.phase == Phase::Open && spread < self.config.spread_delta * 0.8 {
            messages.push(warnings::SPREAD_LEGS_WIDER.to_owned());
        }
        ExerciseState::new(self.rep_count, self.phase, messages, true)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::Closed;
        self.hip_width = None;
        self.baseline_ankle_distance = None;
        self.open.clear();
        self.close.clear();
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}
