// ABOUTME: Integration tests for two-phase displacement counters
// ABOUTME: Arm raises, knee raises, side bends, and sit-ups count on the return to rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use formcoach_core::LandmarkName;
use formcoach_engine::exercises::common::warnings;
use formcoach_engine::exercises::{
    ArmRaiseConfig, ArmRaiseCounter, KneeRaiseConfig, KneeRaiseCounter, SitUpConfig,
    SitUpCounter, TorsoBendConfig, TorsoBendCounter,
};
use formcoach_engine::{ExerciseCounter, ExerciseState, Phase};
use helpers::synthetic_pose::PoseBuilder;

fn run(counter: &mut dyn ExerciseCounter, frames: &[PoseBuilder]) -> Vec<ExerciseState> {
    frames
        .iter()
        .enumerate()
        .map(|(i, builder)| counter.update(&builder.frame(i as f64 / 30.0), None))
        .collect()
}

/// Shoulders 0.2 apart at height 0.3
fn arms(wrist_y: f64) -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.4, 0.3)
        .point(LandmarkName::RightShoulder, 0.6, 0.3)
        .point(LandmarkName::LeftWrist, 0.35, wrist_y)
        .point(LandmarkName::RightWrist, 0.65, wrist_y)
}

/// Left leg 0.4 long with the knee at `knee_y`
fn leg(knee_y: f64) -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftHip, 0.45, 0.5)
        .point(LandmarkName::LeftKnee, 0.45, knee_y)
        .point(LandmarkName::LeftAnkle, 0.45, 0.9)
}

/// Torso with the shoulders shifted sideways by `shift`
fn torso(shift: f64) -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.4 + shift, 0.3)
        .point(LandmarkName::RightShoulder, 0.6 + shift, 0.3)
        .point(LandmarkName::LeftHip, 0.42, 0.6)
        .point(LandmarkName::RightHip, 0.58, 0.6)
}

/// Side view: knee-hip-shoulder angle near 18 degrees, hips on the floor
fn reclined() -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.8, 0.6)
        .point(LandmarkName::LeftHip, 0.5, 0.7)
        .point(LandmarkName::LeftKnee, 0.8, 0.7)
}

/// Side view: knee-hip-shoulder angle near 108 degrees, hips raised by 0.1
fn raised() -> PoseBuilder {
    PoseBuilder::new()
        .point(LandmarkName::LeftShoulder, 0.5, 0.3)
        .point(LandmarkName::LeftHip, 0.5, 0.6)
        .point(LandmarkName::LeftKnee, 0.8, 0.7)
}

#[test]
fn test_arm_raise_counts_on_lowering() {
    let mut counter = ArmRaiseCounter::new(ArmRaiseConfig::default());
    let states = run(&mut counter, &[arms(0.5), arms(0.1), arms(0.1), arms(0.5)]);

    assert_eq!(states[1].phase, Phase::Up);
    assert_eq!(states[2].rep_count, 0);
    assert_eq!(states[3].rep_count, 1);
    assert_eq!(states[3].phase, Phase::Down);
}

#[test]
fn test_arm_raise_hysteresis_band_holds_phase() {
    let mut counter = ArmRaiseCounter::new(ArmRaiseConfig::default());
    // 0.25 is between the lowered (>= 0.33) and raised (<= 0.21) wrist heights
    let states = run(
        &mut counter,
        &[arms(0.5), arms(0.1), arms(0.25), arms(0.1), arms(0.25)],
    );
    assert!(states.iter().all(|s| s.rep_count == 0));
    assert_eq!(states[4].phase, Phase::Up);
    assert!(states[4].has_warning(warnings::RAISE_ARMS_HIGHER));
}

#[test]
fn test_arm_raise_without_arms_visible() {
    let mut counter = ArmRaiseCounter::new(ArmRaiseConfig::default());
    let states = run(&mut counter, &[leg(0.7)]);
    assert!(states[0].has_warning(warnings::ARMS_NOT_VISIBLE));
    assert_eq!(states[0].phase, Phase::Down);
}

#[test]
fn test_knee_raise_cycle() {
    let mut counter = KneeRaiseCounter::new(KneeRaiseConfig::default());
    let states = run(&mut counter, &[leg(0.7), leg(0.3), leg(0.7), leg(0.3), leg(0.7)]);
    assert_eq!(states[1].phase, Phase::Up);
    assert_eq!(states[4].rep_count, 2);
}

#[test]
fn test_knee_raise_partial_lift_warns() {
    let mut counter = KneeRaiseCounter::new(KneeRaiseConfig::default());
    // Raise of 0.5 leg lengths enters UP, then 0.25 is below 85% of the entry
    let states = run(&mut counter, &[leg(0.7), leg(0.3), leg(0.4)]);
    assert_eq!(states[2].phase, Phase::Up);
    assert!(states[2].has_warning(warnings::LIFT_KNEE_HIGHER));
}

#[test]
fn test_torso_bend_either_side() {
    let mut counter = TorsoBendCounter::new(TorsoBendConfig::default());
    let states = run(
        &mut counter,
        &[torso(0.0), torso(0.08), torso(0.0), torso(-0.08), torso(0.0)],
    );
    assert_eq!(states[0].phase, Phase::Center);
    assert_eq!(states[1].phase, Phase::Bend);
    assert_eq!(states[3].phase, Phase::Bend);
    assert_eq!(states[4].rep_count, 2);
}

#[test]
fn test_situp_requires_angle_and_rise() {
    let mut counter = SitUpCounter::new(SitUpConfig::default());
    let states = run(&mut counter, &[reclined(), raised(), reclined()]);
    assert_eq!(states[0].phase, Phase::Down);
    assert_eq!(states[1].phase, Phase::Up);
    assert_eq!(states[2].rep_count, 1);
    assert_eq!(states[2].phase, Phase::Down);
}

#[test]
fn test_situp_reset_clears_reference() {
    let mut counter = SitUpCounter::new(SitUpConfig::default());
    run(&mut counter, &[reclined(), raised(), reclined()]);
    assert_eq!(counter.rep_count(), 1);

    counter.reset();
    assert_eq!(counter.rep_count(), 0);
    assert_eq!(counter.phase(), Phase::Down);

    // The raised frame becomes the new reference, so there is no rise yet
    let states = run(&mut counter, &[raised()]);
    assert_eq!(states[0].phase, Phase::Down);
}
