// ABOUTME: Shared exercise counter contract, phase labels, and per-update state snapshot
// ABOUTME: Declares the movement-pattern families implemented in the submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise State Machines
//!
//! One [`ExerciseCounter`] per selected exercise consumes pose frames and
//! reports an [`ExerciseState`] snapshot after every frame. Warnings are
//! recomputed on each update and never accumulate.
//!
//! ## Families
//!
//! - **cyclic**: open/close movements with frame debouncing (jumping jacks, leg spreads)
//! - **threshold**: two-phase displacement movements (arm raise, knee raise, torso bend, sit-up)
//! - **strength**: four-phase knee-angle movements (squat, lunge)
//! - **pushup**: calibrated four-phase movement with hip stability tracking
//! - **hold**: isometric READY/HOLDING/COUNTED timers
//! - **pullup**: bar-relative chin height (pull-up, chin-up)

use std::fmt;

use formcoach_core::PoseFrame;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationResult;

/// Warning strings, side selection, and debouncing shared by all families
pub mod common;

/// Open/close cyclic counters
pub mod cyclic;

/// Two-phase displacement counters
pub mod threshold;

/// Four-phase squat and lunge counters
pub mod strength;

/// Calibrated push-up counter
pub mod pushup;

/// Isometric hold counters
pub mod hold;

/// Bar-relative pull-up and chin-up counters
pub mod pullup;

pub use cyclic::{JumpingJackConfig, JumpingJackCounter, LegSpreadConfig, LegSpreadCounter};
pub use hold::{HoldConfig, HoldCounter, HoldJoints};
pub use pullup::{PullUpConfig, PullUpCounter, PullUpVariant};
pub use pushup::{PushUpConfig, PushUpCounter};
pub use strength::{LegSelection, StrengthConfig, StrengthCounter};
pub use threshold::{
    ArmRaiseConfig, ArmRaiseCounter, KneeRaiseConfig, KneeRaiseCounter, SitUpConfig,
    SitUpCounter, TorsoBendConfig, TorsoBendCounter,
};

/// Discrete stage of an exercise state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Gathering baseline measurements
    Calibrating,
    /// Cyclic base position
    Closed,
    /// Cyclic extended position
    Open,
    /// Rest position of a two-phase movement, or descent of a four-phase one
    Down,
    /// Active position of a two-phase movement, or ascent of a four-phase one
    Up,
    /// Upright torso
    Center,
    /// Torso bent sideways
    Bend,
    /// Start and finish of a four-phase movement
    Top,
    /// Deepest point of a four-phase movement
    Bottom,
    /// Hold predicate not yet satisfied
    Ready,
    /// Hold predicate satisfied, timer running
    Holding,
    /// Hold completed and counted
    Counted,
    /// No bar position available
    WaitingBar,
}

impl Phase {
    /// Wire label, e.g. `WAITING_BAR`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calibrating => "CALIBRATING",
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
            Self::Down => "DOWN",
            Self::Up => "UP",
            Self::Center => "CENTER",
            Self::Bend => "BEND",
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Ready => "READY",
            Self::Holding => "HOLDING",
            Self::Counted => "COUNTED",
            Self::WaitingBar => "WAITING_BAR",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot returned by every [`ExerciseCounter::update`] call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseState {
    /// Reps counted since the last reset
    pub rep_count: u32,
    /// Current phase
    pub phase: Phase,
    /// Feedback for this frame only
    pub warnings: Vec<String>,
    /// Whether the rep in progress will be counted
    pub is_rep_valid: bool,
}

impl ExerciseState {
    /// Build a snapshot
    #[must_use]
    pub const fn new(
        rep_count: u32,
        phase: Phase,
        warnings: Vec<String>,
        is_rep_valid: bool,
    ) -> Self {
        Self {
            rep_count,
            phase,
            warnings,
            is_rep_valid,
        }
    }

    /// Snapshot carrying a single signal warning (no pose, joints hidden, ...)
    #[must_use]
    pub fn signal(rep_count: u32, phase: Phase, warning: &str, is_rep_valid: bool) -> Self {
        Self::new(rep_count, phase, vec![warning.to_owned()], is_rep_valid)
    }

    /// Whether `warning` was emitted in this snapshot
    #[must_use]
    pub fn has_warning(&self, warning: &str) -> bool {
        self.warnings.iter().any(|w| w == warning)
    }
}

/// Per-exercise state machine
///
/// `update` never fails. Missing data is reported through warnings and leaves
/// the rep count and phase untouched. `rep_count` never decreases between
/// calls to `reset`.
pub trait ExerciseCounter: Send + fmt::Debug {
    /// Movement family identifier, e.g. `squat`
    fn name(&self) -> &'static str;

    /// Consume one frame, with the bar height when the exercise uses one
    fn update(&mut self, pose: &PoseFrame, bar_y: Option<f64>) -> ExerciseState;

    /// Return to the initial phase with a zero count
    fn reset(&mut self);

    /// Reps counted since the last reset
    fn rep_count(&self) -> u32;

    /// Current phase
    fn phase(&self) -> Phase;

    /// Whether the counter waits for a [`CalibrationResult`]
    fn requires_calibration(&self) -> bool {
        false
    }

    /// Hand over the session calibration result
    fn apply_calibration(&mut self, _calibration: &CalibrationResult) {}

    /// Whether `update` expects a bar position
    fn uses_bar(&self) -> bool {
        false
    }
}
