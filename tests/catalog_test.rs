// ABOUTME: Integration tests for the exercise catalog
// ABOUTME: Validates lookups, counter construction, view hints, and serialized entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use formcoach_core::SystemClock;
use formcoach_engine::{EngineError, ExerciseCatalog, ExerciseKind, Phase, ViewHint};

#[test]
fn test_core_exercises_are_present() {
    let catalog = ExerciseCatalog::standard();
    for id in ["jumping_jack", "squat", "pushup", "pullup", "chinup", "situp", "lunge"] {
        assert!(catalog.get(id).is_some(), "missing {id}");
    }
    assert!(catalog.entries().len() >= 40);
}

#[test]
fn test_every_entry_builds_a_fresh_counter() {
    let catalog = ExerciseCatalog::standard();
    for entry in catalog.entries() {
        let counter = catalog.build(entry.id, SystemClock::shared()).unwrap();
        assert_eq!(counter.rep_count(), 0, "{}", entry.id);
        assert_eq!(counter.uses_bar(), entry.uses_bar(), "{}", entry.id);
    }
}

#[test]
fn test_initial_phases_follow_the_pattern() {
    let catalog = ExerciseCatalog::standard();
    let phase = |id: &str| catalog.build(id, SystemClock::shared()).unwrap().phase();

    assert_eq!(phase("jumping_jack"), Phase::Calibrating);
    assert_eq!(phase("pushup"), Phase::Calibrating);
    assert_eq!(phase("squat"), Phase::Top);
    assert_eq!(phase("pullup"), Phase::WaitingBar);
    assert_eq!(phase("plank_hold"), Phase::Ready);
    assert_eq!(phase("side_bends"), Phase::Center);
    assert_eq!(phase("seal_jack"), Phase::Closed);
}

#[test]
fn test_hold_counters_report_their_entry_id() {
    let catalog = ExerciseCatalog::standard();
    let counter = catalog.build("wall_sit_hold", SystemClock::shared()).unwrap();
    assert_eq!(counter.name(), "wall_sit_hold");
    assert!(matches!(
        catalog.get("wall_sit_hold").unwrap().kind,
        ExerciseKind::Hold(_)
    ));
}

#[test]
fn test_only_pushup_requires_calibration() {
    let catalog = ExerciseCatalog::standard();
    let calibrated: Vec<&str> = catalog
        .entries()
        .iter()
        .filter(|entry| entry.build(SystemClock::shared()).requires_calibration())
        .map(|entry| entry.id)
        .collect();
    assert_eq!(calibrated, vec!["pushup"]);
}

#[test]
fn test_unknown_id_is_an_error() {
    let catalog = ExerciseCatalog::standard();
    let err = catalog.build("burpee", SystemClock::shared()).unwrap_err();
    assert_eq!(err, EngineError::UnknownExercise("burpee".to_owned()));
    assert!(err.to_string().contains("burpee"));
}

#[test]
fn test_entries_serialize_with_pattern_tag() {
    let catalog = ExerciseCatalog::standard();
    let pullup = serde_json::to_value(catalog.get("pullup").unwrap()).unwrap();
    assert_eq!(pullup["id"], "pullup");
    assert_eq!(pullup["view_hint"], "bar");
    assert_eq!(pullup["kind"]["pattern"], "pull_up");

    let squat = serde_json::to_value(catalog.get("squat").unwrap()).unwrap();
    assert_eq!(squat["kind"]["config"]["bottom_knee_angle"], 100.0);
    assert_eq!(catalog.get("squat").unwrap().view_hint, ViewHint::Front);
}

#[test]
fn test_catalog_planks_reject_the_threshold_angle() {
    let catalog = ExerciseCatalog::standard();
    for key in ["plank_hold", "side_plank_hold", "glute_bridge"] {
        let Some(ExerciseKind::Hold(config)) = catalog.get(key).map(|entry| &entry.kind) else {
            panic!("{key} should be a hold");
        };
        assert!(config.exclusive_min, "{key}");
        assert!(!config.accepts(config.min_angle), "{key}");
    }
    let Some(ExerciseKind::Hold(wall_sit)) = catalog.get("wall_sit_hold").map(|entry| &entry.kind)
    else {
        panic!("wall_sit_hold should be a hold");
    };
    assert!(wall_sit.accepts(wall_sit.min_angle));
}
