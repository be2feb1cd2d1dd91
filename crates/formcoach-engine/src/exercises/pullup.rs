// ABOUTME: Bar-relative pull-up and chin-up counter
// ABOUTME: UP when the chin clears the bar with valid depth and grip, counted on the drop below
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pull-Ups and Chin-Ups
//!
//! Positions are in image-relative coordinates, the same space as the bar
//! height reported by the bar detector. While no bar is available the
//! snapshot reports WAITING_BAR, but the phase reached so far is kept so a
//! brief detector dropout mid-rep does not lose the rep.

use formcoach_core::geometry::{distance, floor_reference, midpoint};
use formcoach_core::{LandmarkName, PoseFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::warnings;
use super::{ExerciseCounter, ExerciseState, Phase};

const REQUIRED_JOINTS: [LandmarkName; 5] = [
    LandmarkName::Nose,
    LandmarkName::LeftWrist,
    LandmarkName::RightWrist,
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
];

/// Grip style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullUpVariant {
    /// Overhand grip
    PullUp,
    /// Underhand grip, warns on an overly wide grip
    ChinUp,
}

/// Bar-relative thresholds in image-relative units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullUpConfig {
    /// Nose height above the bar needed to enter UP
    pub chin_above_bar: f64,
    /// Nose height below the bar that completes the rep
    pub bottom_reset_delta: f64,
    /// Minimum wrist spread in shoulder widths
    pub grip_width_min: f64,
    /// Maximum wrist spread in shoulder widths for chin-ups
    pub chinup_grip_width_max: f64,
    /// Largest accepted shoulder-minus-nose depth
    pub max_face_depth_delta: f64,
    /// Largest accepted vertical wrist distance from the bar
    pub wrist_bar_y_delta: f64,
}

impl Default for PullUpConfig {
    fn default() -> Self {
        Self {
            chin_above_bar: 0.015,
            bottom_reset_delta: 0.08,
            grip_width_min: 0.15,
            chinup_grip_width_max: 1.4,
            max_face_depth_delta: 0.15,
            wrist_bar_y_delta: 0.08,
        }
    }
}

/// Pull-up or chin-up counter
#[derive(Debug)]
pub struct PullUpCounter {
    variant: PullUpVariant,
    config: PullUpConfig,
    rep_count: u32,
    phase: Phase,
    bar_visible: bool,
}

impl PullUpCounter {
    /// Create a counter for `variant`
    #[must_use]
    pub const fn new(variant: PullUpVariant, config: PullUpConfig) -> Self {
        Self {
            variant,
            config,
            rep_count: 0,
            phase: Phase::WaitingBar,
            bar_visible: false,
        }
    }

    /// Phase as reported to callers; a rep in progress is kept underneath
    /// while the bar is missing
    const fn exposed_phase(&self) -> Phase {
        if self.bar_visible {
            self.phase
        } else {
            Phase::WaitingBar
        }
    }
}

impl ExerciseCounter for PullUpCounter {
    fn name(&self) -> &'static str {
        match self.variant {
            PullUpVariant::PullUp => "pullup",
            PullUpVariant::ChinUp => "chinup",
        }
    }

    fn update(&mut self, pose: &PoseFrame, bar_y: Option<f64>) -> ExerciseState {
        if !pose.is_valid() {
            return ExerciseState::signal(
                self.rep_count,
                self.exposed_phase(),
                warnings::NO_POSE,
                true,
            );
        }
        let Some(bar_y) = bar_y else {
            self.bar_visible = false;
            return ExerciseState::signal(
                self.rep_count,
                Phase::WaitingBar,
                warnings::BAR_NOT_FOUND,
                true,
            );
        };
        self.bar_visible = true;
        let Some([nose, left_wrist, right_wrist, left_shoulder, right_shoulder]) =
            pose.raw().group(REQUIRED_JOINTS)
        else {
            return ExerciseState::signal(
                self.rep_count,
                self.phase,
                warnings::UPPER_BODY_NOT_VISIBLE,
                true,
            );
        };

        let cfg = &self.config;
        let wrist_spread = distance(left_wrist, right_wrist);
        let shoulder_width = distance(left_shoulder, right_shoulder);
        let shoulder_z = midpoint(left_shoulder, right_shoulder).z;
        let wrist_y = midpoint(left_wrist, right_wrist).y;

        let depth_ok = shoulder_z - nose.z <= cfg.max_face_depth_delta;
        let wrists_on_bar = (wrist_y - bar_y).abs() <= cfg.wrist_bar_y_delta;
        let chin_above = bar_y - nose.y > cfg.chin_above_bar && depth_ok && wrists_on_bar;
        let chin_below = nose.y - bar_y > cfg.bottom_reset_delta;

        let mut messages = Vec::new();
        if wrist_spread < cfg.grip_width_min * floor_reference(shoulder_width) {
            messages.push(warnings::WIDER_GRIP.to_owned());
        }
        if !depth_ok {
            messages.push(warnings::MOVE_BACK.to_owned());
        }
        if !wrists_on_bar {
            messages.push(warnings::KEEP_WRISTS_ON_BAR.to_owned());
        }
        if self.variant == PullUpVariant::ChinUp
            && wrist_spread > shoulder_width * cfg.chinup_grip_width_max
        {
            messages.push(warnings::NARROWER_GRIP.to_owned());
        }

        match self.phase {
            Phase::WaitingBar | Phase::Down if chin_above => {
                debug!(exercise = self.name(), bar_y, nose_y = nose.y, "Chin above bar");
                self.phase = Phase::Up;
            }
            Phase::Up if chin_below => {
                self.rep_count += 1;
                self.phase = Phase::Down;
                info!(exercise = self.name(), reps = self.rep_count, "Rep counted");
            }
            _ => {}
        }

        ExerciseState::new(self.rep_count, self.phase, messages, true)
    }

    fn reset(&mut self) {
        self.rep_count = 0;
        self.phase = Phase::WaitingBar;
        self.bar_visible = false;
    }

    fn rep_count(&self) -> u32 {
        self.rep_count
    }

    fn phase(&self) -> Phase {
        self.exposed_phase()
    }

    fn uses_bar(&self) -> bool {
        true
    }
}
