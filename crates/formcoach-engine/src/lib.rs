// ABOUTME: Exercise state-machine engine, passive calibration, and bar detection
// ABOUTME: Turns normalized pose frames into rep counts, phases, and form warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Formcoach Engine
//!
//! Per-frame rep counting on top of `formcoach-core` pose frames.
//!
//! Every exercise implements [`ExerciseCounter`]: `update` is synchronous,
//! never fails, and reports missing data as warnings while leaving counters
//! untouched. Exercises are configurations of a small set of movement
//! patterns (cyclic open/close, two-phase threshold, four-phase strength,
//! isometric hold, bar-relative), listed in the [`catalog`].

/// Engine error types
pub mod errors;

/// Robust statistics helpers
pub mod stats;

/// Passive per-session calibration
pub mod calibration;

/// Horizontal bar detection from grayscale frames
pub mod bar_detection;

/// Exercise state machines
pub mod exercises;

/// Named exercise configurations
pub mod catalog;

pub use bar_detection::{BarDetector, BarDetectorConfig};
pub use calibration::{CalibrationConfig, CalibrationResult, PassiveCalibrator};
pub use catalog::{ExerciseCatalog, ExerciseEntry, ExerciseKind, ViewHint};
pub use errors::{EngineError, EngineResult};
pub use exercises::{ExerciseCounter, ExerciseState, Phase};
