// ABOUTME: Named exercise configurations mapped onto the movement-pattern counters
// ABOUTME: Stable ids, display names, camera view hints, and fresh counter construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Catalog
//!
//! Most exercises are tuned variants of a handful of patterns. An entry holds
//! the pattern and its thresholds; [`ExerciseCatalog::build`] creates a new
//! counter with clean state every time it is called.

use std::fmt;

use formcoach_core::SharedClock;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::exercises::{
    ArmRaiseConfig, ArmRaiseCounter, ExerciseCounter, HoldConfig, HoldCounter, HoldJoints,
    JumpingJackConfig, JumpingJackCounter, KneeRaiseConfig, KneeRaiseCounter, LegSpreadConfig,
    LegSpreadCounter, PullUpConfig, PullUpCounter, PullUpVariant, PushUpConfig, PushUpCounter,
    SitUpConfig, SitUpCounter, StrengthConfig, StrengthCounter, TorsoBendConfig,
    TorsoBendCounter,
};

/// Camera placement that gives the counter the landmarks it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewHint {
    /// Facing the camera
    Front,
    /// Side-on to the camera
    Side,
    /// Facing the camera with the bar in frame
    Bar,
}

impl fmt::Display for ViewHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Front => "Front",
            Self::Side => "Side",
            Self::Bar => "Bar",
        })
    }
}

/// Movement pattern plus thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", content = "config", rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Self-calibrating arms-and-legs open/close
    JumpingJack(JumpingJackConfig),
    /// Legs-only open/close
    LegSpread(LegSpreadConfig),
    /// Two-arm raise
    ArmRaise(ArmRaiseConfig),
    /// Single knee raise
    KneeRaise(KneeRaiseConfig),
    /// Lateral torso bend
    TorsoBend(TorsoBendConfig),
    /// Sit-up
    SitUp(SitUpConfig),
    /// Four-phase squat
    Squat(StrengthConfig),
    /// Four-phase lunge
    Lunge(StrengthConfig),
    /// Calibrated push-up
    PushUp(PushUpConfig),
    /// Timed isometric hold
    Hold(HoldConfig),
    /// Bar-relative pull
    PullUp(PullUpVariant, PullUpConfig),
}

/// One selectable exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseEntry {
    /// Stable identifier used by sessions and logs
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Suggested camera view
    pub view_hint: ViewHint,
    /// Pattern and thresholds
    pub kind: ExerciseKind,
}

impl ExerciseEntry {
    const fn new(
        id: &'static str,
        name: &'static str,
        view_hint: ViewHint,
        kind: ExerciseKind,
    ) -> Self {
        Self {
            id,
            name,
            view_hint,
            kind,
        }
    }

    /// Whether the counter needs a bar position
    #[must_use]
    pub const fn uses_bar(&self) -> bool {
        matches!(self.kind, ExerciseKind::PullUp(..))
    }

    /// Create a counter with clean state
    #[must_use]
    pub fn build(&self, clock: SharedClock) -> Box<dyn ExerciseCounter> {
        match &self.kind {
            ExerciseKind::JumpingJack(config) => {
                Box::new(JumpingJackCounter::new(config.clone(), clock))
            }
            ExerciseKind::LegSpread(config) => Box::new(LegSpreadCounter::new(config.clone())),
            ExerciseKind::ArmRaise(config) => Box::new(ArmRaiseCounter::new(config.clone())),
            ExerciseKind::KneeRaise(config) => Box::new(KneeRaiseCounter::new(config.clone())),
            ExerciseKind::TorsoBend(config) => Box::new(TorsoBendCounter::new(config.clone())),
            ExerciseKind::SitUp(config) => Box::new(SitUpCounter::new(config.clone())),
            ExerciseKind::Squat(config) => Box::new(StrengthCounter::squat(config.clone())),
            ExerciseKind::Lunge(config) => Box::new(StrengthCounter::lunge(config.clone())),
            ExerciseKind::PushUp(config) => Box::new(PushUpCounter::new(config.clone())),
            ExerciseKind::Hold(config) => {
                Box::new(HoldCounter::new(self.id, config.clone(), clock))
            }
            ExerciseKind::PullUp(variant, config) => {
                Box::new(PullUpCounter::new(*variant, config.clone()))
            }
        }
    }
}

/// Ordered list of every selectable exercise
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    entries: Vec<ExerciseEntry>,
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExerciseCatalog {
    /// The built-in exercise list
    #[must_use]
    pub fn standard() -> Self {
        use ExerciseKind as K;
        use ViewHint::{Bar, Front, Side};

        let jack = |arm, leg| K::JumpingJack(JumpingJackConfig::with_factors(arm, leg));
        let spread = |open, close| K::LegSpread(LegSpreadConfig::with_deltas(open, close));
        let knee = |raise_delta, lower_delta| {
            K::KneeRaise(KneeRaiseConfig {
                raise_delta,
                lower_delta,
            })
        };
        let arms = |raise_delta, lower_delta| {
            K::ArmRaise(ArmRaiseConfig {
                raise_delta,
                lower_delta,
            })
        };
        let bend = |bend_delta, return_delta| {
            K::TorsoBend(TorsoBendConfig {
                bend_delta,
                return_delta,
            })
        };
        let squat =
            |bottom, hip_drop| K::Squat(StrengthConfig::squat().with_depth(bottom, hip_drop));
        let lunge =
            |bottom, hip_drop| K::Lunge(StrengthConfig::lunge().with_depth(bottom, hip_drop));
        let trunk_hold = |min, max, secs| {
            K::Hold(HoldConfig::new(HoldJoints::ShoulderHipKnee, min, max, secs))
        };
        let straight_hold = |min, secs| {
            let config = HoldConfig::new(HoldJoints::ShoulderHipKnee, min, 180.0, secs);
            K::Hold(config.with_exclusive_min())
        };
        let knee_hold = |min, max, secs| {
            K::Hold(HoldConfig::new(HoldJoints::HipKneeAnkle, min, max, secs))
        };
        let pull = |variant| K::PullUp(variant, PullUpConfig::default());

        let entries = vec![
            ExerciseEntry::new(
                "jumping_jack",
                "Jumping Jack",
                Front,
                K::JumpingJack(JumpingJackConfig::default()),
            ),
            ExerciseEntry::new("squat", "Squat", Front, K::Squat(StrengthConfig::squat())),
            ExerciseEntry::new("pushup", "Push-Up", Side, K::PushUp(PushUpConfig::default())),
            ExerciseEntry::new("pullup", "Pull-Up", Bar, pull(PullUpVariant::PullUp)),
            ExerciseEntry::new("chinup", "Chin-Up", Bar, pull(PullUpVariant::ChinUp)),
            ExerciseEntry::new("situp", "Sit-Up", Side, K::SitUp(SitUpConfig::default())),
            // Standing cardio and arms
            ExerciseEntry::new("step_jack", "Step Jack", Front, jack(0.45, 0.5)),
            ExerciseEntry::new("half_jack", "Half Jack", Front, jack(0.35, 0.4)),
            ExerciseEntry::new("seal_jack", "Seal Jack", Front, spread(0.6, 0.2)),
            ExerciseEntry::new("side_steps", "Side Steps", Front, spread(0.35, 0.15)),
            ExerciseEntry::new("high_knees", "High Knees", Front, knee(0.42, 0.15)),
            ExerciseEntry::new("marching", "Marching", Front, knee(0.25, 0.12)),
            ExerciseEntry::new("arm_raises", "Arm Raises", Front, arms(0.35, 0.15)),
            ExerciseEntry::new("overhead_raises", "Overhead Raises", Front, arms(0.55, 0.2)),
            ExerciseEntry::new("lateral_raises", "Lateral Raises", Front, arms(0.25, 0.12)),
            ExerciseEntry::new("side_bends", "Side Bends", Front, bend(0.22, 0.08)),
            // Squat variants
            ExerciseEntry::new("wide_squat", "Wide Squat", Front, squat(100.0, 0.2)),
            ExerciseEntry::new("narrow_squat", "Narrow Squat", Front, squat(95.0, 0.16)),
            ExerciseEntry::new("half_squat", "Half Squat", Front, squat(120.0, 0.12)),
            ExerciseEntry::new("pulse_squat", "Pulse Squat", Front, squat(110.0, 0.15)),
            ExerciseEntry::new("jump_squat", "Jump Squat", Front, squat(100.0, 0.18)),
            // Lunge variants
            ExerciseEntry::new("lunge", "Lunge", Side, K::Lunge(StrengthConfig::lunge())),
            ExerciseEntry::new("forward_lunge", "Forward Lunge", Side, lunge(95.0, 0.18)),
            ExerciseEntry::new("reverse_lunge", "Reverse Lunge", Side, lunge(95.0, 0.18)),
            ExerciseEntry::new("split_squat", "Split Squat", Side, lunge(100.0, 0.16)),
            ExerciseEntry::new("side_lunge", "Side Lunge", Front, lunge(105.0, 0.16)),
            // Ground and core holds
            ExerciseEntry::new("plank_hold", "Plank Hold", Side, straight_hold(160.0, 2.0)),
            ExerciseEntry::new(
                "side_plank_hold",
                "Side Plank Hold",
                Side,
                straight_hold(155.0, 2.0),
            ),
            ExerciseEntry::new("wall_sit_hold", "Wall Sit Hold", Side, knee_hold(80.0, 110.0, 2.5)),
            ExerciseEntry::new("glute_bridge", "Glute Bridge", Side, straight_hold(155.0, 1.5)),
            ExerciseEntry::new("hip_hinge", "Hip Hinge", Side, trunk_hold(60.0, 110.0, 1.0)),
            ExerciseEntry::new("knee_tucks", "Knee Tucks", Side, knee(0.3, 0.12)),
            // Further variations
            ExerciseEntry::new("skater_steps", "Skater Steps", Front, spread(0.5, 0.2)),
            ExerciseEntry::new("toe_touches", "Toe Touches", Front, bend(0.28, 0.1)),
            ExerciseEntry::new("arm_pulses", "Arm Pulses", Front, arms(0.2, 0.08)),
            ExerciseEntry::new("fast_jacks", "Fast Jacks", Front, jack(0.5, 0.6)),
            ExerciseEntry::new("slow_jacks", "Slow Jacks", Front, jack(0.7, 0.75)),
            ExerciseEntry::new("low_jacks", "Low Jacks", Front, jack(0.35, 0.5)),
            ExerciseEntry::new("power_jacks", "Power Jacks", Front, jack(0.75, 0.85)),
            ExerciseEntry::new("box_squat", "Box Squat", Side, squat(100.0, 0.2)),
            ExerciseEntry::new("tempo_squat", "Tempo Squat", Front, squat(105.0, 0.18)),
            ExerciseEntry::new(
                "split_squat_hold",
                "Split Squat Hold",
                Side,
                knee_hold(80.0, 115.0, 2.0),
            ),
        ];
        Self { entries }
    }

    /// All entries in display order
    #[must_use]
    pub fn entries(&self) -> &[ExerciseEntry] {
        &self.entries
    }

    /// Look up an entry by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExerciseEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Create a fresh counter for `id`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownExercise` when `id` is not in the catalog.
    pub fn build(&self, id: &str, clock: SharedClock) -> EngineResult<Box<dyn ExerciseCounter>> {
        self.get(id)
            .map(|entry| entry.build(clock))
            .ok_or_else(|| EngineError::UnknownExercise(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let catalog = ExerciseCatalog::standard();
        let ids: HashSet<_> = catalog.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), catalog.entries().len());
    }

    #[test]
    fn test_only_pull_patterns_use_the_bar() {
        let catalog = ExerciseCatalog::standard();
        for entry in catalog.entries() {
            assert_eq!(entry.uses_bar(), entry.view_hint == ViewHint::Bar, "{}", entry.id);
        }
    }
}
